//! Deploy command - the full gated pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use dab_deploy::{DatabricksCli, Target};
use dab_pipeline::{GatePipeline, PipelineConfig, RunOutcome, StepKind, StepStatus};

use crate::ExitCodes;

#[derive(Args)]
pub struct DeployArgs {
    /// Path to the bundle project
    #[arg(short, long, default_value = ".")]
    path: PathBuf,

    /// Deployment target (dev, staging, prod)
    #[arg(short, long)]
    target: Target,

    /// Treat policy warnings as failures
    #[arg(long)]
    strict: bool,

    /// Report file path (defaults to validation/validation_report_<ts>.txt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Run every step except the deployment itself
    #[arg(long)]
    dry_run: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: String,
}

pub async fn execute(args: DeployArgs) -> Result<u8> {
    info!("Running gated deployment to target '{}'", args.target);

    let mut config = PipelineConfig::new(&args.path, args.target)
        .strict(args.strict)
        .skip_deploy(args.dry_run);
    if let Some(output) = &args.output {
        config = config.with_report_path(output);
    }

    let pipeline = GatePipeline::new(config, Arc::new(DatabricksCli::new()));
    let outcome = pipeline.run().await.context("Pipeline run failed")?;

    if args.format == "json" {
        let json = serde_json::to_string_pretty(&outcome)
            .context("Failed to serialize outcome")?;
        println!("{}", json);
    } else {
        print_outcome(&outcome);
    }

    Ok(exit_code_for(&outcome))
}

fn print_outcome(outcome: &RunOutcome) {
    println!("Pipeline run {} (target: {})", outcome.run_id, outcome.target);
    println!();
    for step in &outcome.steps {
        let marker = match step.status {
            StepStatus::Passed => "ok  ",
            StepStatus::Failed => "FAIL",
            StepStatus::Skipped => "skip",
        };
        println!("  [{}] {:<22} {}", marker, step.kind.name(), step.message);
    }

    if let Some(report) = &outcome.report_path {
        println!();
        println!("Report: {}", report.display());
    }

    println!();
    if outcome.passed {
        println!("Pipeline PASSED");
    } else {
        println!("Pipeline FAILED");
    }
}

/// Exit status mirrors the first failed required step.
fn exit_code_for(outcome: &RunOutcome) -> u8 {
    match outcome.first_failed_step() {
        None => ExitCodes::SUCCESS,
        Some(StepKind::StructuralValidation) => ExitCodes::STRUCTURAL_FAILURE,
        Some(StepKind::PolicyValidation) => ExitCodes::POLICY_FAILURE,
        Some(StepKind::Deployment) => ExitCodes::DEPLOY_FAILURE,
        Some(_) => ExitCodes::GENERAL_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dab_pipeline::StepRecord;

    fn outcome_failing_at(kind: StepKind) -> RunOutcome {
        let mut outcome = RunOutcome::new(Target::Dev, false);
        outcome.add_step(StepRecord::failed(kind, "failed", 1));
        outcome.finalize();
        outcome
    }

    #[test]
    fn exit_code_mirrors_the_first_failed_step() {
        assert_eq!(
            exit_code_for(&outcome_failing_at(StepKind::StructuralValidation)),
            ExitCodes::STRUCTURAL_FAILURE
        );
        assert_eq!(
            exit_code_for(&outcome_failing_at(StepKind::PolicyValidation)),
            ExitCodes::POLICY_FAILURE
        );
        assert_eq!(
            exit_code_for(&outcome_failing_at(StepKind::Deployment)),
            ExitCodes::DEPLOY_FAILURE
        );
    }

    #[test]
    fn passing_outcome_exits_zero() {
        let mut outcome = RunOutcome::new(Target::Dev, false);
        outcome.add_step(StepRecord::passed(StepKind::StructuralValidation, "ok", 1));
        outcome.add_step(StepRecord::passed(StepKind::PolicyValidation, "ok", 1));
        outcome.add_step(StepRecord::passed(StepKind::Deployment, "ok", 1));
        outcome.finalize();

        assert_eq!(exit_code_for(&outcome), ExitCodes::SUCCESS);
    }
}
