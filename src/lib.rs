//! sprintzero - Change-Impact Analysis for Codebases
//!
//! Given a snapshot of a repository and a free-text change request, produces a
//! structured Sprint-0 assessment: a current-state profile, the files and
//! components the change touches, ranked recommendations, closed-form
//! business metrics, and a fixed section tree ready for rendering.
//!
//! ## Quick Start
//!
//! ```ignore
//! use sprintzero::{SnapshotBuilder, analyze};
//!
//! let input = SnapshotBuilder::new("./my-service").build()?;
//! let report = analyze(&input, "Migrate session storage to Redis");
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: local checkout snapshot (file walk, manifest parsing)
//! - [`pipeline`]: the six analysis stages and the report tree
//! - [`config`]: layered configuration
//! - [`cli`]: command handlers for the `sprintzero` binary

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod pipeline;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{Config, ConfigLoader};

pub use types::error::{Result, ResultExt, SprintError};

pub use analyzer::{FileScanner, SnapshotBuilder};

pub use pipeline::{
    AssessmentPipeline, ChangeContext, ChangeRequest, Classifier, CurrentStateProfile,
    ImpactAnalysis, MetricsReport, ProfilerInput, RecommendationSet, Report, analyze, fingerprint,
};
