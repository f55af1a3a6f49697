//! Run notification.
//!
//! Notification is best-effort by contract: the pipeline logs notifier
//! failures and never lets them fail the run.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use dab_deploy::Target;

/// Condensed run result handed to notifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunDigest {
    pub run_id: Uuid,
    pub target: Target,
    pub passed: bool,
    pub critical: usize,
    pub warnings: usize,
    pub advisories: usize,
    pub deployed: bool,
}

/// Delivery channel for run results.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, digest: &RunDigest) -> anyhow::Result<()>;
}

/// Notifier that emits structured log events. A webhook or email
/// implementation would sit behind the same trait.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, digest: &RunDigest) -> anyhow::Result<()> {
        if digest.passed {
            info!(
                run_id = %digest.run_id,
                target = %digest.target,
                deployed = digest.deployed,
                "Pipeline run passed ({} warnings, {} suggestions)",
                digest.warnings, digest.advisories
            );
        } else {
            error!(
                run_id = %digest.run_id,
                target = %digest.target,
                "Pipeline run failed ({} critical issues, {} warnings)",
                digest.critical, digest.warnings
            );
        }
        Ok(())
    }
}
