//! Validation report rendering and persistence.
//!
//! The report format is a stable contract with CI consumers: `=`-banner
//! delimited sections, severity buckets in fixed order, numbered entries,
//! and a trailing `SUMMARY:` line. The rendered body depends only on the
//! recorded violations, so re-validating an unchanged project produces an
//! identical body; the artifact header carries the run timestamp.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use dab_bundle::BundleProject;

use crate::error::{PolicyError, PolicyResult};
use crate::violation::{Severity, Violation};

const BANNER_WIDTH: usize = 80;

/// Per-severity counts, rendered in the summary line.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportSummary {
    pub critical: usize,
    pub warnings: usize,
    pub advisories: usize,
}

impl ReportSummary {
    pub fn total(&self) -> usize {
        self.critical + self.warnings + self.advisories
    }
}

/// An immutable aggregation of violations from one validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub project_path: String,
    pub violations: Vec<Violation>,
    pub generated_at: DateTime<Utc>,
}

impl ValidationReport {
    pub fn new(project_path: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            project_path: project_path.into(),
            violations,
            generated_at: Utc::now(),
        }
    }

    /// Violations of one severity, in recorded order.
    pub fn bucket(&self, severity: Severity) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            critical: self.bucket(Severity::Critical).len(),
            warnings: self.bucket(Severity::Warning).len(),
            advisories: self.bucket(Severity::Advisory).len(),
        }
    }

    /// Validation verdict. Strict mode treats warnings as failures.
    pub fn passed(&self, strict: bool) -> bool {
        let summary = self.summary();
        summary.critical == 0 && (!strict || summary.warnings == 0)
    }

    /// Render the report body.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let banner = "=".repeat(BANNER_WIDTH);

        out.push_str(&banner);
        out.push('\n');
        out.push_str("VALIDATION RESULTS\n");
        out.push_str(&banner);
        out.push('\n');

        let summary = self.summary();
        if summary.total() == 0 {
            out.push_str("STATUS: All enterprise policies are compliant.\n");
            out.push_str(
                "No issues found - configuration meets all organizational requirements.\n",
            );
            out.push_str(&banner);
            out.push('\n');
            return out;
        }

        for severity in Severity::all() {
            let entries = self.bucket(severity);
            if entries.is_empty() {
                continue;
            }

            out.push('\n');
            out.push_str(severity.heading());
            out.push('\n');
            out.push_str(&"-".repeat(severity.rule_width()));
            out.push('\n');
            for (i, violation) in entries.iter().enumerate() {
                out.push_str(&format!("{:2}. {}\n", i + 1, violation.render()));
            }
        }

        out.push('\n');
        out.push_str(&banner);
        out.push('\n');
        out.push_str(&format!(
            "SUMMARY: {} critical issues, {} warnings, {} suggestions\n",
            summary.critical, summary.warnings, summary.advisories
        ));
        out.push_str(&banner);
        out.push('\n');

        out
    }

    /// Persist the report artifact: generated header plus rendered body.
    /// Creates the parent directory if needed. Reports are write-once.
    pub fn write_to(&self, path: &Path) -> PolicyResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut content = String::new();
        content.push_str("# Enterprise DAB Validation Report\n");
        content.push_str(&format!(
            "# Generated: {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        ));
        content.push_str(&format!("# Project Path: {}\n\n", self.project_path));
        content.push_str(&self.render());

        fs::write(path, content).map_err(|e| PolicyError::ReportWriteFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        info!("Validation report saved to {:?}", path);
        Ok(())
    }

    /// Default artifact location: `validation/validation_report_<ts>.txt`
    /// under the project root.
    pub fn default_artifact_path(project: &BundleProject, generated_at: DateTime<Utc>) -> PathBuf {
        project.validation_dir().join(format!(
            "validation_report_{}.txt",
            generated_at.format("%Y%m%d_%H%M%S")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_violations() -> Vec<Violation> {
        vec![
            Violation::critical("Policy violation", "Job 'A' missing required tag 'team'"),
            Violation::critical("Security violation", "Potential hardcoded secret found"),
            Violation::warning("Naming convention", "Job 'b' should start with a capital letter"),
            Violation::advisory("Best practice", "Job 'A' should have timeout_seconds configured"),
        ]
    }

    #[test]
    fn summary_counts_match_listed_entries() {
        let report = ValidationReport::new(".", sample_violations());
        let summary = report.summary();

        assert_eq!(summary.critical, report.bucket(Severity::Critical).len());
        assert_eq!(summary.warnings, report.bucket(Severity::Warning).len());
        assert_eq!(summary.advisories, report.bucket(Severity::Advisory).len());

        let body = report.render();
        assert!(body.contains("SUMMARY: 2 critical issues, 1 warnings, 1 suggestions"));
    }

    #[test]
    fn buckets_render_in_fixed_order() {
        let report = ValidationReport::new(".", sample_violations());
        let body = report.render();

        let critical = body.find("[CRITICAL]").unwrap();
        let warning = body.find("[WARNING]").unwrap();
        let advisory = body.find("[ADVISORY]").unwrap();
        assert!(critical < warning && warning < advisory);
    }

    #[test]
    fn empty_bucket_sections_are_omitted() {
        let report = ValidationReport::new(
            ".",
            vec![Violation::advisory("Best practice", "configure timeouts")],
        );
        let body = report.render();

        assert!(!body.contains("[CRITICAL]"));
        assert!(!body.contains("[WARNING]"));
        assert!(body.contains("[ADVISORY]"));
    }

    #[test]
    fn clean_report_renders_compliant_banner() {
        let report = ValidationReport::new(".", Vec::new());
        let body = report.render();

        assert!(body.contains("STATUS: All enterprise policies are compliant."));
        assert!(!body.contains("SUMMARY:"));
    }

    #[test]
    fn strict_mode_fails_on_warnings() {
        let report = ValidationReport::new(
            ".",
            vec![Violation::warning("Naming convention", "lowercase job key")],
        );

        assert!(report.passed(false));
        assert!(!report.passed(true));
    }

    #[test]
    fn advisories_never_fail_validation() {
        let report = ValidationReport::new(
            ".",
            vec![Violation::advisory("Best practice", "configure timeouts")],
        );

        assert!(report.passed(false));
        assert!(report.passed(true));
    }

    #[test]
    fn rendering_is_idempotent() {
        let report = ValidationReport::new(".", sample_violations());
        assert_eq!(report.render(), report.render());
    }

    #[test]
    fn write_to_creates_parent_and_header() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("validation").join("report.txt");

        let report = ValidationReport::new("/proj", sample_violations());
        report.write_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Enterprise DAB Validation Report"));
        assert!(content.contains("# Project Path: /proj"));
        assert!(content.contains("VALIDATION RESULTS"));
    }
}
