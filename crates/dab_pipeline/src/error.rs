//! Error types for the pipeline module.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that abort a pipeline run before its steps can record outcomes.
/// Step failures (validation verdicts, non-zero CLI exits) are not errors;
/// they are recorded in the run outcome.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Bundle error: {0}")]
    Bundle(#[from] dab_bundle::BundleError),

    #[error("Policy error: {0}")]
    Policy(#[from] dab_policy::PolicyError),

    #[error("Deploy error: {0}")]
    Deploy(#[from] dab_deploy::DeployError),

    #[error("Run log serialization failed: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
