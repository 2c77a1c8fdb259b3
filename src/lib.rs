//! Hierarchical command dispatch.
//!
//! A [`CommandTree`] routes a list of tokens from its root down to a node,
//! completes partially typed tokens and explains nodes through a helper the
//! root reserves under `help`.
//!
//! ```
//! use cmdtree::{Caller, TreeBuilder};
//!
//! struct Console;
//!
//! impl Caller for Console {
//!     fn send_message(&self, message: &str) {
//!         println!("{message}");
//!     }
//! }
//!
//! let tree = TreeBuilder::<&str, Console>::new("admin", "server administration")
//!     .node("config", "configuration", |config| config.leaf("set", "sets a value"))
//!     .build()?;
//!
//! assert!(tree.dispatch(&Console, &["config".to_string(), "set".to_string()])?);
//! assert_eq!(tree.complete(&Console, &["config".to_string(), "s".to_string()]), vec!["set"]);
//! # Ok::<(), cmdtree::TreeError>(())
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{
    Caller, CommandNode, CommandTree, HelperNode, Invocation, Node, NodeBuilder, NodeWrapper,
    RootNode, TreeBuilder, TreeError, TreeRender, TreeResult,
};
