//! Data models for Asset Bundle manifests and resource definitions.
//!
//! The manifest (`databricks.yml`) is fully typed. Resource documents keep
//! their raw YAML tree alongside typed job views: policy checks that walk
//! arbitrary nesting (sensitive-field usage, secret scanning) operate on the
//! raw tree, while structural checks use the typed views.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// Root manifest parsed from `databricks.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleManifest {
    pub bundle: BundleInfo,
    /// Global variable declarations, shared by every target.
    #[serde(default)]
    pub variables: BTreeMap<String, VariableSpec>,
    /// Named deployment targets.
    #[serde(default)]
    pub targets: BTreeMap<String, TargetConfig>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Bundle identity block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleInfo {
    pub name: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A variable declaration: either a full spec with description/default, or a
/// bare literal value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableSpec {
    Declared {
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        default: Option<Value>,
    },
    Literal(Value),
}

/// Deployment mode for a target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentMode {
    Development,
    Production,
}

/// Per-target configuration block.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TargetConfig {
    #[serde(default)]
    pub mode: Option<DeploymentMode>,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub workspace: Option<WorkspaceConfig>,
    /// Target-scoped variable overrides. Override global declarations.
    #[serde(default)]
    pub variables: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Workspace connection parameters. Credentials stay in the environment and
/// are consumed by the external CLI, never read here.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl BundleManifest {
    /// Variable names visible to each target: global declarations merged with
    /// the target's own overrides. With no targets defined, the globals are
    /// reported under a single pseudo-target so consistency checks still
    /// have something to compare.
    pub fn merged_variable_names(&self) -> BTreeMap<String, BTreeSet<String>> {
        let global: BTreeSet<String> = self.variables.keys().cloned().collect();
        let mut merged = BTreeMap::new();

        for (target, config) in &self.targets {
            let mut names = global.clone();
            names.extend(config.variables.keys().cloned());
            merged.insert(target.clone(), names);
        }

        if merged.is_empty() && !global.is_empty() {
            merged.insert("global".to_string(), global);
        }

        merged
    }
}

/// A single YAML file under `resources/`.
#[derive(Debug, Clone)]
pub struct ResourceDocument {
    /// Path relative to the project root.
    pub path: String,
    /// Raw document tree, for checks that walk arbitrary nesting.
    pub raw: Value,
    /// Typed views of `resources.jobs.*`, keyed by job identifier.
    pub jobs: BTreeMap<String, JobDefinition>,
}

/// A job definition under `resources.jobs`. Lenient to unknown fields; only
/// the attributes the policy checks inspect are typed.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JobDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, Value>,
    #[serde(default)]
    pub job_clusters: Vec<JobCluster>,
    #[serde(default)]
    pub tasks: Vec<JobTask>,
    #[serde(default)]
    pub email_notifications: Option<EmailNotifications>,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub max_concurrent_runs: Option<u32>,
    #[serde(default)]
    pub retry_on_timeout: Option<bool>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A job cluster entry.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JobCluster {
    #[serde(default)]
    pub job_cluster_key: Option<String>,
    #[serde(default)]
    pub new_cluster: Option<ClusterSpec>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// New-cluster specification within a job cluster.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClusterSpec {
    #[serde(default)]
    pub num_workers: Option<NumWorkers>,
    #[serde(default)]
    pub node_type_id: Option<String>,
    #[serde(default)]
    pub custom_tags: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Worker count: a literal, or a `${var...}` expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumWorkers {
    Count(i64),
    Expr(String),
}

impl NumWorkers {
    /// Literal worker count, if the value resolves to one without variable
    /// substitution.
    pub fn literal(&self) -> Option<i64> {
        match self {
            Self::Count(n) => Some(*n),
            Self::Expr(s) => s.parse().ok(),
        }
    }
}

/// Email notification settings on a job.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EmailNotifications {
    #[serde(default)]
    pub on_failure: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A task within a job.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JobTask {
    #[serde(default)]
    pub task_key: Option<String>,
    #[serde(default)]
    pub notebook_task: Option<NotebookTask>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Notebook task parameters.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotebookTask {
    #[serde(default)]
    pub notebook_path: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl JobDefinition {
    /// Effective tags: job-level `tags` merged with every cluster's
    /// `new_cluster.custom_tags`. Only tag names matter to the policy layer.
    pub fn effective_tag_names(&self) -> BTreeSet<String> {
        let mut names: BTreeSet<String> = self.tags.keys().cloned().collect();
        for cluster in &self.job_clusters {
            if let Some(spec) = &cluster.new_cluster {
                names.extend(spec.custom_tags.keys().cloned());
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_merges_global_and_target_variables() {
        let yaml = r#"
bundle:
  name: analytics
variables:
  catalog:
    description: Unity Catalog name
    default: main
targets:
  dev:
    mode: development
    variables:
      warehouse_id: abc
  prod:
    mode: production
"#;
        let manifest: BundleManifest = serde_yaml::from_str(yaml).unwrap();
        let merged = manifest.merged_variable_names();

        assert_eq!(
            merged["dev"],
            ["catalog", "warehouse_id"].iter().map(|s| s.to_string()).collect()
        );
        assert_eq!(
            merged["prod"],
            ["catalog"].iter().map(|s| s.to_string()).collect()
        );
    }

    #[test]
    fn manifest_without_targets_reports_globals() {
        let yaml = r#"
bundle:
  name: analytics
variables:
  catalog:
    default: main
"#;
        let manifest: BundleManifest = serde_yaml::from_str(yaml).unwrap();
        let merged = manifest.merged_variable_names();

        assert_eq!(merged.len(), 1);
        assert!(merged["global"].contains("catalog"));
    }

    #[test]
    fn job_effective_tags_include_cluster_custom_tags() {
        let yaml = r#"
name: Nightly ETL
tags:
  team: data
job_clusters:
  - job_cluster_key: main
    new_cluster:
      num_workers: 2
      custom_tags:
        cost_center: cc-123
"#;
        let job: JobDefinition = serde_yaml::from_str(yaml).unwrap();
        let names = job.effective_tag_names();

        assert!(names.contains("team"));
        assert!(names.contains("cost_center"));
    }

    #[test]
    fn num_workers_accepts_literal_and_expression() {
        let literal: NumWorkers = serde_yaml::from_str("4").unwrap();
        assert_eq!(literal.literal(), Some(4));

        let expr: NumWorkers = serde_yaml::from_str("\"${var.workers}\"").unwrap();
        assert_eq!(expr.literal(), None);
    }
}
