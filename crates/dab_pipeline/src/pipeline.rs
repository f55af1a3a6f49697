//! The deployment gating pipeline.
//!
//! Strict step order: structural validation → policy validation → report
//! publication → deployment → notification. Deployment runs if and only if
//! both validation steps passed (the gate is conjunctive). A required
//! step's failure short-circuits the remaining required steps; report
//! publication and notification run regardless of earlier failures. No
//! retries; a failed run must be corrected and re-triggered.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use dab_bundle::BundleProject;
use dab_deploy::{BundleCli, DeployError, Target};
use dab_policy::{PolicyValidator, ValidationReport};

use crate::error::PipelineResult;
use crate::notify::{LogNotifier, Notifier, RunDigest};
use crate::runlog::RunOutcome;
use crate::step::{StepKind, StepRecord, StepStatus};

/// Pipeline run configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Bundle project root.
    pub project_root: PathBuf,
    /// Deployment target.
    pub target: Target,
    /// Treat policy warnings as failures.
    pub strict: bool,
    /// Report artifact path; defaults to the project's `validation/` dir.
    pub report_path: Option<PathBuf>,
    /// Skip the deployment step (validation-only run).
    pub skip_deploy: bool,
    /// Persist the run log under `.dabgate/runs/`.
    pub persist_run_log: bool,
}

impl PipelineConfig {
    pub fn new(project_root: impl Into<PathBuf>, target: Target) -> Self {
        Self {
            project_root: project_root.into(),
            target,
            strict: false,
            report_path: None,
            skip_deploy: false,
            persist_run_log: true,
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    pub fn skip_deploy(mut self, skip: bool) -> Self {
        self.skip_deploy = skip;
        self
    }
}

/// Executes the gating sequence against one project and target.
pub struct GatePipeline {
    config: PipelineConfig,
    cli: Arc<dyn BundleCli>,
    validator: PolicyValidator,
    notifier: Arc<dyn Notifier>,
}

impl GatePipeline {
    pub fn new(config: PipelineConfig, cli: Arc<dyn BundleCli>) -> Self {
        Self {
            config,
            cli,
            validator: PolicyValidator::standard(),
            notifier: Arc::new(LogNotifier),
        }
    }

    pub fn with_validator(mut self, validator: PolicyValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Run the full sequence. Returns the recorded outcome; step failures
    /// are part of the outcome, not `Err`. A missing external CLI aborts
    /// before any step runs.
    pub async fn run(&self) -> PipelineResult<RunOutcome> {
        if !self.cli.is_available().await {
            return Err(DeployError::CliNotAvailable(
                "version probe failed; is it installed and on PATH?".to_string(),
            )
            .into());
        }

        let project = BundleProject::open(&self.config.project_root)?;
        let mut outcome = RunOutcome::new(self.config.target, self.config.strict);

        info!(
            run_id = %outcome.run_id,
            target = %self.config.target,
            "Starting pipeline run"
        );

        outcome.add_step(self.run_structural_validation(&project).await);

        // A structural failure short-circuits the later required steps;
        // only the observability steps below still run.
        let report = if outcome.required_steps_passed() {
            let (policy_record, report) = self.run_policy_validation(&project);
            outcome.add_step(policy_record);
            report
        } else {
            outcome.add_step(StepRecord::skipped(
                StepKind::PolicyValidation,
                "structural validation failed",
            ));
            None
        };

        let (publication, report_path) = self.publish_report(&project, report.as_ref());
        outcome.add_step(publication);
        outcome.report_path = report_path;

        let gate_open = outcome.required_steps_passed();
        outcome.add_step(self.run_deployment(&project, gate_open).await);

        let digest = self.digest(&outcome, report.as_ref());
        outcome.add_step(self.run_notification(&digest).await);

        outcome.finalize();

        if self.config.persist_run_log {
            if let Err(e) = outcome.save(project.root()) {
                warn!("Could not persist run log: {}", e);
            }
        }

        info!(
            run_id = %outcome.run_id,
            "Pipeline run {}",
            if outcome.passed { "PASSED" } else { "FAILED" }
        );

        Ok(outcome)
    }

    async fn run_structural_validation(&self, project: &BundleProject) -> StepRecord {
        let start = Instant::now();
        let kind = StepKind::StructuralValidation;

        match self.cli.validate(project.root(), self.config.target).await {
            Ok(output) if output.success() => StepRecord::passed(
                kind,
                "Bundle structure is valid",
                start.elapsed().as_millis() as u64,
            )
            .with_output(output.combined_output()),
            Ok(output) => StepRecord::failed(
                kind,
                format!("bundle validate exited with code {}", output.exit_code),
                start.elapsed().as_millis() as u64,
            )
            .with_output(output.combined_output()),
            Err(e) => StepRecord::failed(
                kind,
                format!("Could not run bundle validate: {}", e),
                start.elapsed().as_millis() as u64,
            ),
        }
    }

    fn run_policy_validation(
        &self,
        project: &BundleProject,
    ) -> (StepRecord, Option<ValidationReport>) {
        let start = Instant::now();
        let kind = StepKind::PolicyValidation;

        match self.validator.validate(project) {
            Ok(report) => {
                let summary = report.summary();
                let duration = start.elapsed().as_millis() as u64;
                let record = if report.passed(self.config.strict) {
                    StepRecord::passed(
                        kind,
                        format!(
                            "Policies compliant ({} warnings, {} suggestions)",
                            summary.warnings, summary.advisories
                        ),
                        duration,
                    )
                } else {
                    StepRecord::failed(
                        kind,
                        format!(
                            "Policy violations found ({} critical, {} warnings)",
                            summary.critical, summary.warnings
                        ),
                        duration,
                    )
                };
                (record, Some(report))
            }
            Err(e) => (
                StepRecord::failed(
                    kind,
                    format!("Policy validation could not complete: {}", e),
                    start.elapsed().as_millis() as u64,
                ),
                None,
            ),
        }
    }

    fn publish_report(
        &self,
        project: &BundleProject,
        report: Option<&ValidationReport>,
    ) -> (StepRecord, Option<PathBuf>) {
        let start = Instant::now();
        let kind = StepKind::ReportPublication;

        let Some(report) = report else {
            return (
                StepRecord::skipped(kind, "no report produced"),
                None,
            );
        };

        let path = self.config.report_path.clone().unwrap_or_else(|| {
            ValidationReport::default_artifact_path(project, report.generated_at)
        });

        match report.write_to(&path) {
            Ok(()) => (
                StepRecord::passed(
                    kind,
                    format!("Report written to {}", path.display()),
                    start.elapsed().as_millis() as u64,
                ),
                Some(path),
            ),
            Err(e) => (
                StepRecord::failed(
                    kind,
                    format!("Could not write report: {}", e),
                    start.elapsed().as_millis() as u64,
                ),
                None,
            ),
        }
    }

    async fn run_deployment(&self, project: &BundleProject, gate_open: bool) -> StepRecord {
        let kind = StepKind::Deployment;

        if self.config.skip_deploy {
            return StepRecord::skipped(kind, "deployment disabled for this run");
        }
        if !gate_open {
            return StepRecord::skipped(kind, "validation gate closed");
        }

        let start = Instant::now();
        match self.cli.deploy(project.root(), self.config.target).await {
            Ok(output) if output.success() => StepRecord::passed(
                kind,
                format!("Deployed to target '{}'", self.config.target),
                start.elapsed().as_millis() as u64,
            )
            .with_output(output.combined_output()),
            Ok(output) => StepRecord::failed(
                kind,
                format!("bundle deploy exited with code {}", output.exit_code),
                start.elapsed().as_millis() as u64,
            )
            .with_output(output.combined_output()),
            Err(e) => StepRecord::failed(
                kind,
                format!("Could not run bundle deploy: {}", e),
                start.elapsed().as_millis() as u64,
            ),
        }
    }

    async fn run_notification(&self, digest: &RunDigest) -> StepRecord {
        let start = Instant::now();
        let kind = StepKind::Notification;

        match self.notifier.notify(digest).await {
            Ok(()) => StepRecord::passed(
                kind,
                "Result notification sent",
                start.elapsed().as_millis() as u64,
            ),
            Err(e) => {
                // Best-effort by contract; the run verdict is unaffected.
                warn!("Notification failed: {}", e);
                StepRecord::failed(
                    kind,
                    format!("Notification failed: {}", e),
                    start.elapsed().as_millis() as u64,
                )
            }
        }
    }

    fn digest(&self, outcome: &RunOutcome, report: Option<&ValidationReport>) -> RunDigest {
        let summary = report.map(|r| r.summary()).unwrap_or_default();
        RunDigest {
            run_id: outcome.run_id,
            target: self.config.target,
            passed: outcome.required_steps_passed(),
            critical: summary.critical,
            warnings: summary.warnings,
            advisories: summary.advisories,
            deployed: outcome
                .step(StepKind::Deployment)
                .map_or(false, |s| s.status == StepStatus::Passed),
        }
    }
}
