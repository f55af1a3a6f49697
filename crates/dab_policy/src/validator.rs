//! Policy validation over a bundle project.

use tracing::{debug, info};

use dab_bundle::{BundleProject, BundleReader};

use crate::config::PolicyConfig;
use crate::error::PolicyResult;
use crate::report::ValidationReport;
use crate::rules::RuleEngine;
use crate::violation::Violation;

/// Runs the enterprise rule set over a whole project and produces a report.
pub struct PolicyValidator {
    engine: RuleEngine,
}

impl PolicyValidator {
    pub fn new(config: PolicyConfig) -> Self {
        Self {
            engine: RuleEngine::new(config),
        }
    }

    /// Validator with the standard enterprise policy set.
    pub fn standard() -> Self {
        Self::new(PolicyConfig::standard())
    }

    /// Validate the project: environment consistency first, then every
    /// resource document in path order. Unreadable files are recorded as
    /// critical violations rather than aborting the run, so one broken
    /// manifest cannot hide findings in the rest of the bundle.
    pub fn validate(&self, project: &BundleProject) -> PolicyResult<ValidationReport> {
        info!("Running enterprise policy validation on {:?}", project.root());

        let mut violations = Vec::new();

        match BundleReader::read_manifest(project) {
            Ok(manifest) => {
                violations.extend(self.engine.check_environment_consistency(&manifest));
            }
            Err(e) => {
                violations.push(Violation::critical(
                    "Load failure",
                    format!("Failed to load databricks.yml: {}", e),
                ));
            }
        }

        for path in BundleReader::resource_files(project) {
            match BundleReader::read_resource(project, &path) {
                Ok(doc) => {
                    debug!("Checking {}", doc.path);
                    violations.extend(self.engine.check_document(&doc)?);
                }
                Err(e) => {
                    let relative = path
                        .strip_prefix(project.root())
                        .unwrap_or(&path)
                        .display()
                        .to_string();
                    violations.push(
                        Violation::critical(
                            "Load failure",
                            format!("Failed to load resource file: {}", e),
                        )
                        .in_file(relative),
                    );
                }
            }
        }

        let report = ValidationReport::new(project.root().display().to_string(), violations);
        let summary = report.summary();
        info!(
            "Policy validation complete: {} critical, {} warnings, {} advisories",
            summary.critical, summary.warnings, summary.advisories
        );

        Ok(report)
    }
}
