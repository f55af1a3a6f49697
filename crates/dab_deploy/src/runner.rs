//! Bundle CLI trait and invocation result types.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DeployResult;
use crate::target::Target;

/// Captured result of one external CLI invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliOutput {
    /// Process exit code.
    pub exit_code: i32,
    /// Captured stdout.
    pub stdout: String,
    /// Captured stderr.
    pub stderr: String,
    /// Invocation start time.
    pub started_at: DateTime<Utc>,
    /// Duration in milliseconds.
    pub duration_ms: u64,
}

impl CliOutput {
    /// Whether the invocation succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Combined output (stdout + stderr).
    pub fn combined_output(&self) -> String {
        if self.stdout.is_empty() {
            self.stderr.clone()
        } else if self.stderr.is_empty() {
            self.stdout.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Boundary to the bundle deployment tool.
///
/// Implementations return `Ok` with a non-zero [`CliOutput::exit_code`] for
/// tool-reported failures; `Err` means the tool could not be invoked.
#[async_trait]
pub trait BundleCli: Send + Sync {
    /// Check that the tool is installed and runnable.
    async fn is_available(&self) -> bool;

    /// Run `bundle validate --target <t>` in the project directory.
    async fn validate(&self, project_root: &Path, target: Target) -> DeployResult<CliOutput>;

    /// Run `bundle deploy --target <t>` in the project directory.
    async fn deploy(&self, project_root: &Path, target: Target) -> DeployResult<CliOutput>;
}
