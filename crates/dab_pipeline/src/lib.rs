//! # dab_pipeline
//!
//! The validation/deploy gating pipeline for dabgate.
//!
//! A run executes, in strict order: structural validation, policy
//! validation, report publication, conditional deployment, notification.
//! Deployment is gated on BOTH validations passing, and a required step's
//! failure short-circuits the remaining required steps; report publication
//! and notification always run so failures stay visible.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use dab_deploy::{DatabricksCli, Target};
//! use dab_pipeline::{GatePipeline, PipelineConfig};
//!
//! let config = PipelineConfig::new("./my-bundle", Target::Staging).strict(true);
//! let pipeline = GatePipeline::new(config, Arc::new(DatabricksCli::new()));
//! let outcome = pipeline.run().await?;
//!
//! if !outcome.passed {
//!     std::process::exit(1);
//! }
//! ```

pub mod error;
pub mod notify;
pub mod pipeline;
pub mod runlog;
pub mod step;

pub use error::{PipelineError, PipelineResult};
pub use notify::{LogNotifier, Notifier, RunDigest};
pub use pipeline::{GatePipeline, PipelineConfig};
pub use runlog::RunOutcome;
pub use step::{StepKind, StepRecord, StepStatus};
