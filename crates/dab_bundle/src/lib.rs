//! # dab_bundle
//!
//! Asset Bundle project model for dabgate.
//!
//! This crate provides:
//! - **Project Layout**: Locate `databricks.yml` and `resources/`
//! - **Typed Manifest**: Bundle identity, variables, deployment targets
//! - **Resource Documents**: Raw YAML trees plus typed job views

pub mod error;
pub mod models;
pub mod project;
pub mod reader;

pub use error::{BundleError, BundleResult};
pub use models::{
    BundleInfo, BundleManifest, ClusterSpec, DeploymentMode, EmailNotifications, JobCluster,
    JobDefinition, JobTask, NotebookTask, NumWorkers, ResourceDocument, TargetConfig,
    VariableSpec, WorkspaceConfig,
};
pub use project::{BundleProject, MANIFEST_FILE, RESOURCES_DIR};
pub use reader::BundleReader;
