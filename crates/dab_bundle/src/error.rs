//! Error types for the bundle module.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for bundle operations.
pub type BundleResult<T> = Result<T, BundleError>;

/// Errors that can occur while reading a bundle project.
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Bundle project not found at path: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Bundle manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("Invalid bundle format in file {}: {message}", .path.display())]
    InvalidFormat { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
