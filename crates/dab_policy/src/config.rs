//! Policy configuration: the enterprise rule parameters.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Tunable parameters for the enterprise policy checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Tags every job must carry (job tags merged with cluster custom_tags).
    pub required_tags: BTreeSet<String>,
    /// Fields whose values must come from `${...}` variables, never literals.
    pub sensitive_fields: BTreeSet<String>,
    /// Regex patterns flagging hardcoded credentials, matched against the
    /// serialized document. Case-insensitive.
    pub secret_patterns: Vec<String>,
    /// Notebook path prefixes considered non-standard locations.
    pub suspicious_notebook_prefixes: Vec<String>,
    /// Upper bound on `max_concurrent_runs` before a warning is raised.
    pub max_concurrent_runs_limit: u32,
    /// Worker count above which a cost advisory is raised.
    pub worker_count_threshold: i64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            required_tags: ["cost_center", "environment", "team"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            sensitive_fields: [
                "existing_cluster_id",
                "instance_pool_id",
                "warehouse_id",
                "catalog",
                "schema",
                "volume",
                "storage_location",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            secret_patterns: vec![
                r#"(?im)^\s*(password|passwd|pwd)s?\s*[:=]\s*['"]?[^'"\s]+"#.to_string(),
                r#"(?im)^\s*secrets?\s*[:=]\s*['"]?[^'"\s]+"#.to_string(),
                r#"(?im)^\s*tokens?\s*[:=]\s*['"]?[^'"\s]+"#.to_string(),
                r#"(?im)^\s*(api[_-]?key|access[_-]?key)s?\s*[:=]\s*['"]?[^'"\s]+"#.to_string(),
            ],
            suspicious_notebook_prefixes: vec!["/tmp/".to_string(), "/personal/".to_string()],
            max_concurrent_runs_limit: 5,
            worker_count_threshold: 10,
        }
    }
}

impl PolicyConfig {
    /// The standard enterprise policy set.
    pub fn standard() -> Self {
        Self::default()
    }
}
