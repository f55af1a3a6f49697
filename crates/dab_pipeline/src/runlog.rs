//! Persistent run outcomes.
//!
//! Every pipeline run writes a JSON record under `.dabgate/runs/`, pass or
//! fail, so CI failures can be inspected after the fact.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use dab_deploy::Target;

use crate::error::{PipelineError, PipelineResult};
use crate::step::{StepKind, StepRecord, StepStatus};

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub run_id: Uuid,
    pub target: Target,
    pub strict: bool,
    /// Verdict over the required steps. Finalized at the end of the run.
    pub passed: bool,
    pub steps: Vec<StepRecord>,
    /// Published report artifact, when publication succeeded.
    pub report_path: Option<PathBuf>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl RunOutcome {
    pub fn new(target: Target, strict: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            target,
            strict,
            passed: false,
            steps: Vec::new(),
            report_path: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn add_step(&mut self, record: StepRecord) {
        self.steps.push(record);
    }

    /// The record for a step, if it has run.
    pub fn step(&self, kind: StepKind) -> Option<&StepRecord> {
        self.steps.iter().find(|s| s.kind == kind)
    }

    /// Whether every required step so far has avoided failure. A skipped
    /// deployment does not fail the run; a closed gate already implies a
    /// failed validation step.
    pub fn required_steps_passed(&self) -> bool {
        !self
            .steps
            .iter()
            .any(|s| s.kind.is_required() && s.status == StepStatus::Failed)
    }

    /// First failed required step, in execution order. Drives the exit code.
    pub fn first_failed_step(&self) -> Option<StepKind> {
        self.steps
            .iter()
            .find(|s| s.kind.is_required() && s.status == StepStatus::Failed)
            .map(|s| s.kind)
    }

    /// Seal the outcome: set the verdict and completion time.
    pub fn finalize(&mut self) {
        self.passed = self.required_steps_passed();
        self.completed_at = Some(Utc::now());
    }

    /// Run log location for this outcome under a project root.
    pub fn log_path(&self, project_root: &Path) -> PathBuf {
        project_root
            .join(".dabgate")
            .join("runs")
            .join(format!("{}.json", self.run_id))
    }

    /// Save the run log to disk.
    pub fn save(&self, project_root: &Path) -> PipelineResult<PathBuf> {
        let path = self.log_path(project_root);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PipelineError::Serialization(e.to_string()))?;
        fs::write(&path, json)?;
        debug!("Saved run log to {:?}", path);
        Ok(path)
    }

    /// Load a run log from disk.
    pub fn load(path: &Path) -> PipelineResult<Self> {
        let content = fs::read_to_string(path)?;
        let outcome: Self = serde_json::from_str(&content)
            .map_err(|e| PipelineError::Serialization(e.to_string()))?;
        Ok(outcome)
    }
}
