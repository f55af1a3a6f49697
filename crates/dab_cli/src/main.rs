//! dabgate CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Policy validation failure
//! - 4: Structural validation failure
//! - 5: Deployment failure

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dab_bundle::BundleError;
use dab_deploy::DeployError;
use dab_pipeline::PipelineError;

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const POLICY_FAILURE: u8 = 3;
    pub const STRUCTURAL_FAILURE: u8 = 4;
    pub const DEPLOY_FAILURE: u8 = 5;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::execute(args).await,
        Commands::Deploy(args) => commands::deploy::execute(args).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Initialize logging. `RUST_LOG` takes precedence over the flag-derived
/// level.
fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,dab_bundle={level},dab_policy={level},dab_deploy={level},dab_pipeline={level},dab_cli={level}",
            level = default_level
        ))
    });

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();
}

/// Map command errors to exit codes. Validation verdicts (policy,
/// structural, deploy failures) exit through the commands' `Ok` paths;
/// an `Err` reaching here is environmental. A bad project path or target
/// is the caller's mistake and exits as invalid arguments.
fn categorize_error(e: &anyhow::Error) -> u8 {
    if let Some(err) = e.downcast_ref::<BundleError>() {
        return match err {
            BundleError::NotFound(_) | BundleError::ManifestNotFound(_) => {
                ExitCodes::INVALID_ARGS
            }
            _ => ExitCodes::GENERAL_ERROR,
        };
    }

    if let Some(DeployError::UnknownTarget(_)) = e.downcast_ref::<DeployError>() {
        return ExitCodes::INVALID_ARGS;
    }

    if let Some(PipelineError::Bundle(
        BundleError::NotFound(_) | BundleError::ManifestNotFound(_),
    )) = e.downcast_ref::<PipelineError>()
    {
        return ExitCodes::INVALID_ARGS;
    }

    ExitCodes::GENERAL_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use dab_policy::PolicyError;

    #[test]
    fn missing_project_exits_as_invalid_args() {
        let e = anyhow::Error::new(BundleError::NotFound("/nope".into()));
        assert_eq!(categorize_error(&e), ExitCodes::INVALID_ARGS);
    }

    #[test]
    fn context_does_not_hide_the_original_error() {
        let e = Err::<(), _>(BundleError::ManifestNotFound("/p/databricks.yml".into()))
            .context("Failed to open bundle project")
            .unwrap_err();
        assert_eq!(categorize_error(&e), ExitCodes::INVALID_ARGS);
    }

    #[test]
    fn report_write_failure_is_a_general_error() {
        let e = anyhow::Error::new(PolicyError::ReportWriteFailed {
            path: "validation/report.txt".to_string(),
            message: "disk full".to_string(),
        });
        assert_eq!(categorize_error(&e), ExitCodes::GENERAL_ERROR);
    }

    #[test]
    fn pipeline_wrapped_bundle_error_is_invalid_args() {
        let e = anyhow::Error::new(PipelineError::Bundle(BundleError::NotFound(
            "/nope".into(),
        )));
        assert_eq!(categorize_error(&e), ExitCodes::INVALID_ARGS);
    }
}
