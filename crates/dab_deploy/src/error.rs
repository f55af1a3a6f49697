//! Error types for the deploy module.

use thiserror::Error;

/// Result type alias for deploy operations.
pub type DeployResult<T> = Result<T, DeployError>;

/// Errors that can occur at the external CLI boundary.
///
/// A non-zero exit code from the CLI is NOT an error here: it is a normal
/// gated outcome reported through [`crate::runner::CliOutput`]. Errors are
/// reserved for failures to run the tool at all.
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("databricks CLI not available: {0}")]
    CliNotAvailable(String),

    #[error("Failed to spawn '{program}': {message}")]
    Spawn { program: String, message: String },

    #[error("Unknown deployment target: {0}")]
    UnknownTarget(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
