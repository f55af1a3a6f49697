//! Mock bundle CLI for testing.
//!
//! Returns scripted outputs and captures every invocation, so pipeline
//! tests can prove gating behavior without the real CLI installed.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::error::{DeployError, DeployResult};
use crate::runner::{BundleCli, CliOutput};
use crate::target::Target;

/// Predefined response for one CLI invocation.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl MockResponse {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// A captured invocation, for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedCall {
    pub method: String,
    pub project_root: PathBuf,
    pub target: Target,
}

/// Scripted mock implementation of [`BundleCli`].
#[derive(Clone, Default)]
pub struct MockBundleCli {
    responses: Arc<RwLock<Vec<MockResponse>>>,
    response_index: Arc<AtomicUsize>,
    captured_calls: Arc<RwLock<Vec<CapturedCall>>>,
    available: Arc<RwLock<bool>>,
}

impl MockBundleCli {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(Vec::new())),
            response_index: Arc::new(AtomicUsize::new(0)),
            captured_calls: Arc::new(RwLock::new(Vec::new())),
            available: Arc::new(RwLock::new(true)),
        }
    }

    /// Queue a response; responses are consumed in order across both
    /// `validate` and `deploy`.
    pub fn push_response(&self, response: MockResponse) {
        self.responses.write().push(response);
    }

    pub fn set_available(&self, available: bool) {
        *self.available.write() = available;
    }

    /// Invocations captured so far.
    pub fn captured_calls(&self) -> Vec<CapturedCall> {
        self.captured_calls.read().clone()
    }

    /// Methods invoked, in order.
    pub fn invoked_methods(&self) -> Vec<String> {
        self.captured_calls
            .read()
            .iter()
            .map(|c| c.method.clone())
            .collect()
    }

    fn next_response(&self, method: &str) -> DeployResult<CliOutput> {
        let index = self.response_index.fetch_add(1, Ordering::SeqCst);
        let responses = self.responses.read();
        let response = responses.get(index).cloned().ok_or_else(|| {
            DeployError::Spawn {
                program: "mock".to_string(),
                message: format!("no scripted response for call #{} ({})", index, method),
            }
        })?;

        Ok(CliOutput {
            exit_code: response.exit_code,
            stdout: response.stdout,
            stderr: response.stderr,
            started_at: Utc::now(),
            duration_ms: 1,
        })
    }

    fn capture(&self, method: &str, project_root: &Path, target: Target) {
        self.captured_calls.write().push(CapturedCall {
            method: method.to_string(),
            project_root: project_root.to_path_buf(),
            target,
        });
    }
}

#[async_trait]
impl BundleCli for MockBundleCli {
    async fn is_available(&self) -> bool {
        *self.available.read()
    }

    async fn validate(&self, project_root: &Path, target: Target) -> DeployResult<CliOutput> {
        self.capture("validate", project_root, target);
        self.next_response("validate")
    }

    async fn deploy(&self, project_root: &Path, target: Target) -> DeployResult<CliOutput> {
        self.capture("deploy", project_root, target);
        self.next_response("deploy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn responses_are_consumed_in_order() {
        let mock = MockBundleCli::new();
        mock.push_response(MockResponse::success("validated"));
        mock.push_response(MockResponse::failure(1, "deploy denied"));

        let temp = tempfile::tempdir().unwrap();
        let first = mock.validate(temp.path(), Target::Dev).await.unwrap();
        let second = mock.deploy(temp.path(), Target::Dev).await.unwrap();

        assert!(first.success());
        assert_eq!(second.exit_code, 1);
        assert_eq!(mock.invoked_methods(), vec!["validate", "deploy"]);
    }

    #[tokio::test]
    async fn exhausted_script_is_an_error() {
        let mock = MockBundleCli::new();
        let temp = tempfile::tempdir().unwrap();

        assert!(mock.validate(temp.path(), Target::Dev).await.is_err());
    }
}
