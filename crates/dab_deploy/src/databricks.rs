//! Real `databricks` CLI invocation.
//!
//! Workspace hosts and access tokens are read by the CLI itself from its
//! profile or `DATABRICKS_HOST`/`DATABRICKS_TOKEN`; this wrapper passes the
//! environment through untouched.

use std::path::Path;
use std::process::Command;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use crate::error::{DeployError, DeployResult};
use crate::runner::{BundleCli, CliOutput};
use crate::target::Target;

/// Shells out to the `databricks` CLI.
#[derive(Debug, Clone)]
pub struct DatabricksCli {
    program: String,
}

impl Default for DatabricksCli {
    fn default() -> Self {
        Self {
            program: "databricks".to_string(),
        }
    }
}

impl DatabricksCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the program name (e.g. an absolute path in CI images).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn run(&self, project_root: &Path, args: &[&str]) -> DeployResult<CliOutput> {
        debug!("Executing {} {}", self.program, args.join(" "));
        let started_at = Utc::now();
        let start = Instant::now();

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(project_root)
            .output()
            .map_err(|e| DeployError::Spawn {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        Ok(CliOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[async_trait]
impl BundleCli for DatabricksCli {
    async fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    async fn validate(&self, project_root: &Path, target: Target) -> DeployResult<CliOutput> {
        info!("Running bundle validate for target '{}'", target);
        self.run(project_root, &["bundle", "validate", "--target", target.name()])
    }

    async fn deploy(&self, project_root: &Path, target: Target) -> DeployResult<CliOutput> {
        info!("Running bundle deploy for target '{}'", target);
        self.run(project_root, &["bundle", "deploy", "--target", target.name()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn spawn_failure_is_an_error_not_an_exit_code() {
        let temp = tempfile::tempdir().unwrap();
        let cli = DatabricksCli::new().with_program("nonexistent-databricks-cli");

        let result = cli.validate(temp.path(), Target::Dev).await;
        assert!(matches!(result, Err(DeployError::Spawn { .. })));
    }

    #[tokio::test]
    async fn missing_program_reports_unavailable() {
        let cli = DatabricksCli::new().with_program("nonexistent-databricks-cli");
        assert!(!cli.is_available().await);
    }
}
