//! CLI command definitions.
//!
//! This module defines the command structure for the dabgate CLI.
//! Each subcommand maps to one stage of the bundle delivery workflow.

use clap::{Parser, Subcommand};

pub mod deploy;
pub mod validate;

/// dabgate - policy gate and deployment pipeline for Asset Bundles
#[derive(Parser)]
#[command(name = "dabgate")]
#[command(version, about = "dabgate - policy gate and deployment pipeline for Asset Bundles")]
#[command(long_about = r#"
dabgate validates Databricks Asset Bundle projects against enterprise
policies and gates deployment on the validation verdict.

WORKFLOWS:
  validate   → Run enterprise policy validation and write the report
  deploy     → Full gated pipeline: validate → policy → report → deploy → notify

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Policy validation failure
  4 - Structural validation failure
  5 - Deployment failure

Workspace hosts and access tokens are read by the external databricks CLI
from its environment (DATABRICKS_HOST / DATABRICKS_TOKEN).
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a bundle project against enterprise policies
    Validate(validate::ValidateArgs),

    /// Run the full gated deployment pipeline
    Deploy(deploy::DeployArgs),
}
