//! # dab_policy
//!
//! Enterprise policy validation for Databricks Asset Bundles.
//!
//! This crate provides:
//! - **Rule Engine**: variable usage, naming, tagging, security, cost, and
//!   operational checks over bundle resource documents
//! - **Policy Validator**: whole-project validation with deterministic output
//! - **Validation Report**: fixed-format text artifact with severity buckets
//!   (CRITICAL, WARNING, ADVISORY) and a summary line
//!
//! ## Example
//!
//! ```rust,ignore
//! use dab_bundle::BundleProject;
//! use dab_policy::PolicyValidator;
//!
//! let project = BundleProject::open("./my-bundle")?;
//! let report = PolicyValidator::standard().validate(&project)?;
//!
//! println!("{}", report.render());
//! if !report.passed(strict) {
//!     std::process::exit(1);
//! }
//! ```

pub mod config;
pub mod error;
pub mod report;
pub mod rules;
pub mod validator;
pub mod violation;

pub use config::PolicyConfig;
pub use error::{PolicyError, PolicyResult};
pub use report::{ReportSummary, ValidationReport};
pub use rules::RuleEngine;
pub use validator::PolicyValidator;
pub use violation::{Severity, Violation};
