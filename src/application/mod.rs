//! Application layer: loading trees from manifests
//!
//! This layer turns files into domain trees and owns the loading errors.

pub mod error;
pub mod manifest;

pub use error::{ApplicationError, ApplicationResult};
pub use manifest::{render_reply, Manifest, ManifestNode, ARGS_PLACEHOLDER};
