//! Enterprise policy rules.
//!
//! Each check takes a resource document (or the manifest) and yields
//! violations. Checks never mutate inputs and iterate in deterministic
//! order, so repeated validation of an unchanged project produces an
//! identical report.

use regex::Regex;
use serde_yaml::Value;
use tracing::debug;

use dab_bundle::{BundleManifest, ResourceDocument};

use crate::config::PolicyConfig;
use crate::error::{PolicyError, PolicyResult};
use crate::violation::Violation;

/// Evaluates the enterprise rule set against bundle documents.
pub struct RuleEngine {
    config: PolicyConfig,
}

impl RuleEngine {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Run every document-level check, in fixed order.
    pub fn check_document(&self, doc: &ResourceDocument) -> PolicyResult<Vec<Violation>> {
        let mut violations = Vec::new();
        violations.extend(self.check_variable_usage(doc));
        violations.extend(self.check_naming_conventions(doc));
        violations.extend(self.check_required_tags(doc));
        violations.extend(self.check_security_compliance(doc)?);
        violations.extend(self.check_cost_optimization(doc));
        violations.extend(self.check_best_practices(doc));
        Ok(violations)
    }

    /// Sensitive fields must reference variables, not literal values.
    pub fn check_variable_usage(&self, doc: &ResourceDocument) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.walk_sensitive_fields(&doc.raw, String::new(), doc, &mut violations);
        violations
    }

    fn walk_sensitive_fields(
        &self,
        value: &Value,
        path: String,
        doc: &ResourceDocument,
        violations: &mut Vec<Violation>,
    ) {
        match value {
            Value::Mapping(map) => {
                for (key, child) in map {
                    let Some(key) = key.as_str() else { continue };
                    let current = if path.is_empty() {
                        key.to_string()
                    } else {
                        format!("{}.{}", path, key)
                    };

                    if self.config.sensitive_fields.contains(key) {
                        if let Some(literal) = child.as_str() {
                            if !literal.starts_with("${") {
                                violations.push(
                                    Violation::critical(
                                        "Policy violation",
                                        format!(
                                            "'{}' must use variables, not hardcoded value '{}'",
                                            current, literal
                                        ),
                                    )
                                    .in_file(&doc.path),
                                );
                            }
                        }
                    }

                    self.walk_sensitive_fields(child, current, doc, violations);
                }
            }
            Value::Sequence(seq) => {
                for (i, child) in seq.iter().enumerate() {
                    self.walk_sensitive_fields(child, format!("{}[{}]", path, i), doc, violations);
                }
            }
            _ => {}
        }
    }

    /// Job keys capitalized, names carry the environment, cluster keys in
    /// lowercase snake case.
    pub fn check_naming_conventions(&self, doc: &ResourceDocument) -> Vec<Violation> {
        let job_key_re = Regex::new(r"^[A-Z][a-zA-Z0-9_]*").ok();
        let cluster_key_re = Regex::new(r"^[a-z][a-z0-9_]*$").ok();
        let mut violations = Vec::new();

        for (job_key, job) in &doc.jobs {
            if let Some(re) = &job_key_re {
                if !re.is_match(job_key) {
                    violations.push(
                        Violation::warning(
                            "Naming convention",
                            format!("Job '{}' should start with a capital letter", job_key),
                        )
                        .for_resource(job_key)
                        .in_file(&doc.path),
                    );
                }
            }

            let name = job.name.as_deref().unwrap_or_default();
            if !name.contains("${bundle.environment}") {
                violations.push(
                    Violation::warning(
                        "Best practice",
                        format!("Job '{}' name should include an environment reference", job_key),
                    )
                    .for_resource(job_key)
                    .in_file(&doc.path),
                );
            }

            for cluster in &job.job_clusters {
                let Some(key) = cluster.job_cluster_key.as_deref() else { continue };
                if key.is_empty() {
                    continue;
                }
                if let Some(re) = &cluster_key_re {
                    if !re.is_match(key) {
                        violations.push(
                            Violation::warning(
                                "Naming convention",
                                format!(
                                    "Job cluster key '{}' should use lowercase with underscores",
                                    key
                                ),
                            )
                            .for_resource(job_key)
                            .in_file(&doc.path),
                        );
                    }
                }
            }
        }

        violations
    }

    /// Required enterprise tags: one critical violation per missing tag,
    /// per job. Cluster custom_tags count toward coverage.
    pub fn check_required_tags(&self, doc: &ResourceDocument) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (job_key, job) in &doc.jobs {
            let present = job.effective_tag_names();
            for tag in self.config.required_tags.difference(&present) {
                violations.push(
                    Violation::critical(
                        "Policy violation",
                        format!("Job '{}' missing required tag '{}'", job_key, tag),
                    )
                    .for_resource(job_key)
                    .in_file(&doc.path),
                );
            }
        }

        violations
    }

    /// Hardcoded credentials, non-standard notebook locations, and excessive
    /// concurrency limits.
    pub fn check_security_compliance(&self, doc: &ResourceDocument) -> PolicyResult<Vec<Violation>> {
        let mut violations = Vec::new();

        let serialized = serde_yaml::to_string(&doc.raw)?;
        for pattern in &self.config.secret_patterns {
            let regex = Regex::new(pattern).map_err(|e| PolicyError::RuleEvaluationFailed {
                rule: "secret-scan".to_string(),
                message: format!("Invalid regex '{}': {}", pattern, e),
            })?;

            // Variable references are the sanctioned way to carry
            // credentials; only literal values are flagged.
            let has_literal_match = regex
                .find_iter(&serialized)
                .any(|m| !m.as_str().contains("${"));

            if has_literal_match {
                violations.push(
                    Violation::critical(
                        "Security violation",
                        "Potential hardcoded secret found".to_string(),
                    )
                    .in_file(&doc.path),
                );
            }
        }

        for (job_key, job) in &doc.jobs {
            for task in &job.tasks {
                let Some(notebook) = &task.notebook_task else { continue };
                let Some(path) = notebook.notebook_path.as_deref() else { continue };
                if self
                    .config
                    .suspicious_notebook_prefixes
                    .iter()
                    .any(|prefix| path.contains(prefix.as_str()))
                {
                    violations.push(
                        Violation::warning(
                            "Security concern",
                            format!(
                                "Notebook path '{}' in job '{}' uses a non-standard location",
                                path, job_key
                            ),
                        )
                        .for_resource(job_key)
                        .in_file(&doc.path),
                    );
                }
            }

            if let Some(runs) = job.max_concurrent_runs {
                if runs > self.config.max_concurrent_runs_limit {
                    violations.push(
                        Violation::warning(
                            "Security policy",
                            format!(
                                "Job '{}' max_concurrent_runs ({}) exceeds recommended limit of {}",
                                job_key, runs, self.config.max_concurrent_runs_limit
                            ),
                        )
                        .for_resource(job_key)
                        .in_file(&doc.path),
                    );
                }
            }
        }

        Ok(violations)
    }

    /// Worker counts and hardcoded node types.
    pub fn check_cost_optimization(&self, doc: &ResourceDocument) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (job_key, job) in &doc.jobs {
            for cluster in &job.job_clusters {
                let Some(spec) = &cluster.new_cluster else { continue };

                if let Some(workers) = spec.num_workers.as_ref().and_then(|w| w.literal()) {
                    if workers > self.config.worker_count_threshold {
                        violations.push(
                            Violation::advisory(
                                "Cost optimization",
                                format!(
                                    "Job '{}' cluster has {} workers. Consider if this is necessary for the workload",
                                    job_key, workers
                                ),
                            )
                            .for_resource(job_key)
                            .in_file(&doc.path),
                        );
                    }
                }

                if let Some(node_type) = spec.node_type_id.as_deref() {
                    if !node_type.starts_with("${") {
                        violations.push(
                            Violation::advisory(
                                "Cost optimization",
                                format!(
                                    "Job '{}' uses hardcoded node_type_id. Consider variables for easier cost management across environments",
                                    job_key
                                ),
                            )
                            .for_resource(job_key)
                            .in_file(&doc.path),
                        );
                    }
                }
            }
        }

        violations
    }

    /// Operational best practices: failure notifications, timeouts, retry
    /// configuration.
    pub fn check_best_practices(&self, doc: &ResourceDocument) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (job_key, job) in &doc.jobs {
            let has_failure_emails = job
                .email_notifications
                .as_ref()
                .map_or(false, |n| !n.on_failure.is_empty());
            if !has_failure_emails {
                violations.push(
                    Violation::advisory(
                        "Best practice",
                        format!("Job '{}' should have email notifications for failures", job_key),
                    )
                    .for_resource(job_key)
                    .in_file(&doc.path),
                );
            }

            if job.timeout_seconds.is_none() {
                violations.push(
                    Violation::advisory(
                        "Best practice",
                        format!("Job '{}' should have timeout_seconds configured", job_key),
                    )
                    .for_resource(job_key)
                    .in_file(&doc.path),
                );
            }

            if job.retry_on_timeout.is_none() {
                violations.push(
                    Violation::advisory(
                        "Best practice",
                        format!("Job '{}' should consider retry_on_timeout configuration", job_key),
                    )
                    .for_resource(job_key)
                    .in_file(&doc.path),
                );
            }
        }

        violations
    }

    /// Variables must be defined consistently across deployment targets.
    pub fn check_environment_consistency(&self, manifest: &BundleManifest) -> Vec<Violation> {
        let per_target = manifest.merged_variable_names();
        if per_target.len() < 2 {
            debug!("Fewer than two targets, skipping consistency check");
            return Vec::new();
        }

        let all_names: std::collections::BTreeSet<&String> =
            per_target.values().flatten().collect();

        let mut violations = Vec::new();
        for name in all_names {
            let missing: Vec<&str> = per_target
                .iter()
                .filter(|(_, vars)| !vars.contains(name.as_str()))
                .map(|(target, _)| target.as_str())
                .collect();

            if !missing.is_empty() {
                violations.push(Violation::warning(
                    "Environment consistency",
                    format!(
                        "Variable '{}' missing in targets: {}",
                        name,
                        missing.join(", ")
                    ),
                ));
            }
        }

        violations
    }
}
