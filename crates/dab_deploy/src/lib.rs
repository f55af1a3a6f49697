//! # dab_deploy
//!
//! Boundary to the external bundle deployment tool (`databricks` CLI).
//!
//! The CLI is treated as a black box with a process-exit-code contract:
//! `bundle validate --target <t>` and `bundle deploy --target <t>` each
//! return zero on success. This crate wraps those invocations behind the
//! [`BundleCli`] trait and ships a scripted mock for tests.

pub mod databricks;
pub mod error;
pub mod mock;
pub mod runner;
pub mod target;

pub use databricks::DatabricksCli;
pub use error::{DeployError, DeployResult};
pub use mock::{CapturedCall, MockBundleCli, MockResponse};
pub use runner::{BundleCli, CliOutput};
pub use target::Target;
