//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::TreeError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),

    #[error("'{0}' was not handled")]
    Rejected(String),
}

impl From<TreeError> for CliError {
    fn from(e: TreeError) -> Self {
        CliError::Application(ApplicationError::Domain(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Rejected(_) => crate::exitcode::SOFTWARE,
            CliError::Application(e) => match e {
                ApplicationError::Domain(tree) if tree.is_routing() => crate::exitcode::USAGE,
                // assembly errors only arise while building from a manifest
                ApplicationError::Domain(_) => crate::exitcode::CONFIG,
                ApplicationError::Manifest { .. }
                | ApplicationError::Config { .. }
                | ApplicationError::Io { .. } => crate::exitcode::CONFIG,
            },
        }
    }
}
