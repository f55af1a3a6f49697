//! Integration tests for the gating pipeline.
//!
//! These use the scripted mock CLI to prove the gate contract: deployment
//! runs only when both validations pass, and the observability steps run
//! no matter what.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use dab_deploy::{MockBundleCli, MockResponse, Target};
use dab_pipeline::{GatePipeline, PipelineConfig, RunOutcome, StepKind, StepStatus};

fn write_manifest(root: &Path) {
    fs::write(
        root.join("databricks.yml"),
        r#"
bundle:
  name: analytics
targets:
  dev:
    mode: development
  prod:
    mode: production
"#,
    )
    .unwrap();
    fs::create_dir_all(root.join("resources")).unwrap();
}

fn write_compliant_job(root: &Path) {
    fs::write(
        root.join("resources").join("etl.yml"),
        r#"
resources:
  jobs:
    Nightly_etl:
      name: "Nightly ETL ${bundle.environment}"
      tags:
        cost_center: cc-1
        environment: "${bundle.environment}"
        team: data
      timeout_seconds: 3600
      retry_on_timeout: true
      email_notifications:
        on_failure:
          - data-alerts@example.com
      job_clusters:
        - job_cluster_key: main
          new_cluster:
            num_workers: 2
            node_type_id: "${var.node_type}"
"#,
    )
    .unwrap();
}

fn write_untagged_job(root: &Path) {
    fs::write(
        root.join("resources").join("untagged.yml"),
        r#"
resources:
  jobs:
    Raw_ingest:
      name: "Raw ingest ${bundle.environment}"
      timeout_seconds: 600
      retry_on_timeout: false
      email_notifications:
        on_failure:
          - data-alerts@example.com
"#,
    )
    .unwrap();
}

// Job with only warning-level findings: lowercase key, no env reference.
fn write_warning_only_job(root: &Path) {
    fs::write(
        root.join("resources").join("scratch.yml"),
        r#"
resources:
  jobs:
    scratch_job:
      name: "scratch"
      tags:
        cost_center: cc-9
        environment: dev
        team: data
      timeout_seconds: 60
      retry_on_timeout: false
      email_notifications:
        on_failure:
          - alerts@example.com
"#,
    )
    .unwrap();
}

fn step_status(outcome: &RunOutcome, kind: StepKind) -> StepStatus {
    outcome.step(kind).expect("step should be recorded").status
}

#[tokio::test]
async fn passing_run_deploys_and_records_every_step() {
    let temp = tempfile::tempdir().unwrap();
    write_manifest(temp.path());
    write_compliant_job(temp.path());

    let mock = MockBundleCli::new();
    mock.push_response(MockResponse::success("bundle validated"));
    mock.push_response(MockResponse::success("deployed"));

    let config = PipelineConfig::new(temp.path(), Target::Dev);
    let outcome = GatePipeline::new(config, Arc::new(mock.clone()))
        .run()
        .await
        .unwrap();

    assert!(outcome.passed);
    assert_eq!(outcome.steps.len(), 5);
    assert_eq!(step_status(&outcome, StepKind::StructuralValidation), StepStatus::Passed);
    assert_eq!(step_status(&outcome, StepKind::PolicyValidation), StepStatus::Passed);
    assert_eq!(step_status(&outcome, StepKind::ReportPublication), StepStatus::Passed);
    assert_eq!(step_status(&outcome, StepKind::Deployment), StepStatus::Passed);
    assert_eq!(step_status(&outcome, StepKind::Notification), StepStatus::Passed);
    assert_eq!(mock.invoked_methods(), vec!["validate", "deploy"]);
}

#[tokio::test]
async fn policy_failure_closes_the_gate() {
    let temp = tempfile::tempdir().unwrap();
    write_manifest(temp.path());
    write_untagged_job(temp.path());

    let mock = MockBundleCli::new();
    mock.push_response(MockResponse::success("bundle validated"));

    let config = PipelineConfig::new(temp.path(), Target::Prod);
    let outcome = GatePipeline::new(config, Arc::new(mock.clone()))
        .run()
        .await
        .unwrap();

    assert!(!outcome.passed);
    assert_eq!(step_status(&outcome, StepKind::PolicyValidation), StepStatus::Failed);
    assert_eq!(step_status(&outcome, StepKind::Deployment), StepStatus::Skipped);
    // the gate is conjunctive: a passing structural validation is not enough
    assert_eq!(mock.invoked_methods(), vec!["validate"]);
    // observability steps still ran
    assert_eq!(step_status(&outcome, StepKind::ReportPublication), StepStatus::Passed);
    assert_eq!(step_status(&outcome, StepKind::Notification), StepStatus::Passed);
}

#[tokio::test]
async fn structural_failure_short_circuits_the_remaining_required_steps() {
    let temp = tempfile::tempdir().unwrap();
    write_manifest(temp.path());
    write_compliant_job(temp.path());

    let mock = MockBundleCli::new();
    mock.push_response(MockResponse::failure(1, "Error: unknown field 'scheduel'"));

    let report_path = temp.path().join("out").join("report.txt");
    let config = PipelineConfig::new(temp.path(), Target::Dev)
        .with_report_path(&report_path);
    let outcome = GatePipeline::new(config, Arc::new(mock.clone()))
        .run()
        .await
        .unwrap();

    assert!(!outcome.passed);
    assert_eq!(outcome.first_failed_step(), Some(StepKind::StructuralValidation));
    assert_eq!(step_status(&outcome, StepKind::PolicyValidation), StepStatus::Skipped);
    assert_eq!(step_status(&outcome, StepKind::Deployment), StepStatus::Skipped);
    assert_eq!(mock.invoked_methods(), vec!["validate"]);
    // no report was produced, so publication records a skip
    assert_eq!(step_status(&outcome, StepKind::ReportPublication), StepStatus::Skipped);
    assert!(!report_path.exists());
    // notification still ran
    assert_eq!(step_status(&outcome, StepKind::Notification), StepStatus::Passed);
    assert_eq!(outcome.steps.len(), 5);
}

#[tokio::test]
async fn unavailable_cli_aborts_before_any_step() {
    let temp = tempfile::tempdir().unwrap();
    write_manifest(temp.path());
    write_compliant_job(temp.path());

    let mock = MockBundleCli::new();
    mock.set_available(false);

    let result = GatePipeline::new(
        PipelineConfig::new(temp.path(), Target::Dev),
        Arc::new(mock.clone()),
    )
    .run()
    .await;

    assert!(result.is_err());
    assert!(mock.invoked_methods().is_empty());
}

#[tokio::test]
async fn strict_mode_turns_warnings_into_gate_failures() {
    let temp = tempfile::tempdir().unwrap();
    write_manifest(temp.path());
    write_warning_only_job(temp.path());

    // Lenient run: warnings do not block
    let mock = MockBundleCli::new();
    mock.push_response(MockResponse::success("validated"));
    mock.push_response(MockResponse::success("deployed"));
    let outcome = GatePipeline::new(
        PipelineConfig::new(temp.path(), Target::Dev),
        Arc::new(mock),
    )
    .run()
    .await
    .unwrap();
    assert!(outcome.passed);

    // Strict run: the same project fails the gate
    let mock = MockBundleCli::new();
    mock.push_response(MockResponse::success("validated"));
    let outcome = GatePipeline::new(
        PipelineConfig::new(temp.path(), Target::Dev).strict(true),
        Arc::new(mock.clone()),
    )
    .run()
    .await
    .unwrap();

    assert!(!outcome.passed);
    assert_eq!(mock.invoked_methods(), vec!["validate"]);
}

#[tokio::test]
async fn dry_run_skips_deployment_even_when_gate_is_open() {
    let temp = tempfile::tempdir().unwrap();
    write_manifest(temp.path());
    write_compliant_job(temp.path());

    let mock = MockBundleCli::new();
    mock.push_response(MockResponse::success("validated"));

    let config = PipelineConfig::new(temp.path(), Target::Staging).skip_deploy(true);
    let outcome = GatePipeline::new(config, Arc::new(mock.clone()))
        .run()
        .await
        .unwrap();

    assert!(outcome.passed);
    assert_eq!(step_status(&outcome, StepKind::Deployment), StepStatus::Skipped);
    assert_eq!(mock.invoked_methods(), vec!["validate"]);
}

#[tokio::test]
async fn deploy_failure_fails_the_run_after_open_gate() {
    let temp = tempfile::tempdir().unwrap();
    write_manifest(temp.path());
    write_compliant_job(temp.path());

    let mock = MockBundleCli::new();
    mock.push_response(MockResponse::success("validated"));
    mock.push_response(MockResponse::failure(1, "Error: workspace unreachable"));

    let outcome = GatePipeline::new(
        PipelineConfig::new(temp.path(), Target::Prod),
        Arc::new(mock),
    )
    .run()
    .await
    .unwrap();

    assert!(!outcome.passed);
    assert_eq!(outcome.first_failed_step(), Some(StepKind::Deployment));
}

#[tokio::test]
async fn run_log_is_persisted_and_loadable() {
    let temp = tempfile::tempdir().unwrap();
    write_manifest(temp.path());
    write_compliant_job(temp.path());

    let mock = MockBundleCli::new();
    mock.push_response(MockResponse::success("validated"));
    mock.push_response(MockResponse::success("deployed"));

    let outcome = GatePipeline::new(
        PipelineConfig::new(temp.path(), Target::Dev),
        Arc::new(mock),
    )
    .run()
    .await
    .unwrap();

    let log_path = outcome.log_path(temp.path());
    assert!(log_path.exists());

    let loaded = RunOutcome::load(&log_path).unwrap();
    assert_eq!(loaded.run_id, outcome.run_id);
    assert!(loaded.passed);
    assert_eq!(loaded.steps.len(), 5);
}
