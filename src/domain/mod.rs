//! Domain layer: the command tree and its traversals
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod caller;
pub mod error;
pub mod filter;
pub mod helper;
pub mod node;
pub mod render;
pub mod root;
pub mod wrapper;

pub use arena::{CommandTree, TreeIterator};
pub use builder::{NodeBuilder, TreeBuilder};
pub use caller::{Caller, Invocation};
pub use error::{TreeError, TreeResult};
pub use filter::{filter_prefix, matches_prefix, tokenize, tokenize_partial};
pub use helper::{Displayer, HelperNode, DEFAULT_HELPER_LABEL, DEFAULT_SEPARATOR};
pub use node::{always_available, Availability, CommandNode, Node};
pub use render::TreeRender;
pub use root::RootNode;
pub use wrapper::{Completer, Executor, HookError, NodeWrapper};
