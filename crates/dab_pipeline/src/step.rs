//! Pipeline steps and their recorded outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed step sequence. Steps always execute in declaration order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// `databricks bundle validate` — syntactic/structural validity.
    StructuralValidation,
    /// Enterprise policy validation (in-process).
    PolicyValidation,
    /// Writing the report artifact. Runs even after failures.
    ReportPublication,
    /// `databricks bundle deploy` — gated on both validations.
    Deployment,
    /// Best-effort result notification. Runs even after failures.
    Notification,
}

impl StepKind {
    /// Required steps decide the run verdict; report publication and
    /// notification are observability and never fail the run.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            Self::StructuralValidation | Self::PolicyValidation | Self::Deployment
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::StructuralValidation => "structural validation",
            Self::PolicyValidation => "policy validation",
            Self::ReportPublication => "report publication",
            Self::Deployment => "deployment",
            Self::Notification => "notification",
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Outcome of one step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Passed,
    Failed,
    Skipped,
}

/// Record of one executed (or skipped) step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub kind: StepKind,
    pub status: StepStatus,
    pub message: String,
    /// Captured tool output, when the step invoked one.
    #[serde(default)]
    pub output: Option<String>,
    pub duration_ms: u64,
    pub completed_at: DateTime<Utc>,
}

impl StepRecord {
    pub fn passed(kind: StepKind, message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            kind,
            status: StepStatus::Passed,
            message: message.into(),
            output: None,
            duration_ms,
            completed_at: Utc::now(),
        }
    }

    pub fn failed(kind: StepKind, message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            kind,
            status: StepStatus::Failed,
            message: message.into(),
            output: None,
            duration_ms,
            completed_at: Utc::now(),
        }
    }

    pub fn skipped(kind: StepKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            status: StepStatus::Skipped,
            message: format!("Skipped: {}", reason.into()),
            output: None,
            duration_ms: 0,
            completed_at: Utc::now(),
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_steps_are_the_gating_ones() {
        assert!(StepKind::StructuralValidation.is_required());
        assert!(StepKind::PolicyValidation.is_required());
        assert!(StepKind::Deployment.is_required());
        assert!(!StepKind::ReportPublication.is_required());
        assert!(!StepKind::Notification.is_required());
    }
}
