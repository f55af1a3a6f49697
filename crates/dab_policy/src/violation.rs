//! Policy violations and severity levels.

use serde::{Deserialize, Serialize};

/// Violation severity. The report renders buckets in this order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Must be fixed; fails validation.
    Critical,
    /// Should be addressed; fails validation in strict mode.
    Warning,
    /// Consider implementing; informational only.
    Advisory,
}

impl Severity {
    /// Section heading used in the rendered report.
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Critical => "[CRITICAL] POLICY VIOLATIONS - MUST BE FIXED:",
            Self::Warning => "[WARNING] POLICY RECOMMENDATIONS - SHOULD BE ADDRESSED:",
            Self::Advisory => "[ADVISORY] OPTIMIZATION SUGGESTIONS - CONSIDER IMPLEMENTING:",
        }
    }

    /// Width of the dash rule under the section heading.
    pub fn rule_width(&self) -> usize {
        match self {
            Self::Critical => 50,
            Self::Warning => 60,
            Self::Advisory => 65,
        }
    }

    /// All severities, in report order.
    pub fn all() -> [Severity; 3] {
        [Self::Critical, Self::Warning, Self::Advisory]
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::Warning => write!(f, "warning"),
            Self::Advisory => write!(f, "advisory"),
        }
    }
}

/// A single policy violation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Violation {
    pub severity: Severity,
    /// Rule category label, e.g. "Policy violation", "Naming convention".
    pub category: String,
    pub message: String,
    /// Resource identifier the violation applies to, if any.
    pub resource: Option<String>,
    /// Source file, relative to the project root.
    pub file: Option<String>,
}

impl Violation {
    pub fn new(
        severity: Severity,
        category: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category: category.into(),
            message: message.into(),
            resource: None,
            file: None,
        }
    }

    pub fn critical(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Critical, category, message)
    }

    pub fn warning(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, category, message)
    }

    pub fn advisory(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Advisory, category, message)
    }

    pub fn for_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Report entry text: `<category>: <message>`, with the source file
    /// appended when known.
    pub fn render(&self) -> String {
        match &self.file {
            Some(file) => format!("{}: {} ({})", self.category, self.message, file),
            None => format!("{}: {}", self.category, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_order_matches_report_order() {
        assert!(Severity::Critical < Severity::Warning);
        assert!(Severity::Warning < Severity::Advisory);
    }

    #[test]
    fn render_includes_file_when_present() {
        let v = Violation::critical("Policy violation", "missing tag 'team'")
            .for_resource("Nightly_etl")
            .in_file("resources/etl.yml");
        assert_eq!(
            v.render(),
            "Policy violation: missing tag 'team' (resources/etl.yml)"
        );
    }
}
