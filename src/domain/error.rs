//! Domain-level errors (no external dependencies)

use generational_arena::Index;
use thiserror::Error;

/// Routing and assembly failures of a command tree.
///
/// Routing errors carry enough context (command, offending segment, full
/// argument line) for the caller to build a message; the tree never renders
/// them itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("unknown argument '{segment}' for '{command}' in: {}", .arguments.join(" "))]
    NodeNotFound {
        command: String,
        segment: String,
        arguments: Vec<String>,
    },

    #[error("argument '{segment}' of command '{command}' is not available")]
    NotAvailableArgument { command: String, segment: String },

    #[error("command '{0}' is not available")]
    NotAvailableCommand(String),

    #[error("label '{label}' already used under '{parent}'")]
    DuplicateLabel { parent: String, label: String },

    #[error("label '{0}' is reserved for the helper")]
    ReservedLabel(String),

    #[error("attaching '{child}' under '{parent}' would create a cycle")]
    CycleDetected { parent: String, child: String },

    #[error("node '{0}' already has a parent")]
    AlreadyAttached(String),

    #[error("no node {0:?} in this tree")]
    UnknownNode(Index),
}

impl TreeError {
    /// True for the errors raised while routing a call, as opposed to
    /// errors raised while assembling the tree.
    pub fn is_routing(&self) -> bool {
        matches!(
            self,
            TreeError::NodeNotFound { .. }
                | TreeError::NotAvailableArgument { .. }
                | TreeError::NotAvailableCommand(_)
        )
    }
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
