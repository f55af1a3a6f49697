//! Validate command - policy validation with report artifact.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use dab_bundle::BundleProject;
use dab_deploy::{BundleCli, DatabricksCli, Target};
use dab_policy::{PolicyValidator, ValidationReport};

use crate::ExitCodes;

#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the bundle project
    #[arg(short, long, default_value = ".")]
    path: PathBuf,

    /// Deployment target (dev, staging, prod)
    #[arg(short, long, default_value = "dev")]
    target: Target,

    /// Treat warnings as failures
    #[arg(long)]
    strict: bool,

    /// Also run the external structural validation (databricks bundle validate)
    #[arg(long)]
    structural: bool,

    /// Report file path (defaults to validation/validation_report_<ts>.txt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: String,
}

pub async fn execute(args: ValidateArgs) -> Result<u8> {
    info!("Validating bundle project: {:?}", args.path);

    let project = BundleProject::open(&args.path)
        .with_context(|| format!("Failed to open bundle project at {:?}", args.path))?;

    let mut structural_failed = false;
    if args.structural {
        println!("Running structural validation (databricks bundle validate)...");
        let cli = DatabricksCli::new();
        if !cli.is_available().await {
            anyhow::bail!("databricks CLI not found on PATH; install it or drop --structural");
        }
        let output = cli
            .validate(project.root(), args.target)
            .await
            .context("Failed to invoke the databricks CLI")?;

        if output.success() {
            println!("   Structural validation passed");
        } else {
            structural_failed = true;
            println!("   Structural validation failed:");
            println!("{}", output.combined_output());
        }
    }

    println!("Running enterprise policy validation...");
    let report = PolicyValidator::standard()
        .validate(&project)
        .context("Policy validation could not complete")?;

    if args.format == "json" {
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        println!("{}", report.render());
    }

    let report_path = args
        .output
        .clone()
        .unwrap_or_else(|| ValidationReport::default_artifact_path(&project, report.generated_at));
    report.write_to(&report_path)
        .with_context(|| format!("Failed to write report to {:?}", report_path))?;
    println!("Validation report saved to: {}", report_path.display());

    if structural_failed {
        return Ok(ExitCodes::STRUCTURAL_FAILURE);
    }
    if !report.passed(args.strict) {
        return Ok(ExitCodes::POLICY_FAILURE);
    }
    Ok(ExitCodes::SUCCESS)
}
