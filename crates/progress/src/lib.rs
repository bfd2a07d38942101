//! Service progress tracking.
//!
//! Step state machine, aggregate progress, completion estimates and the
//! workflow templates jobs are created from.

#![warn(missing_docs)]

pub mod tracker;
pub mod estimator;
pub mod template;

pub use tracker::{ProgressTracker, ProgressSnapshot, validate_transition};
pub use estimator::{CompletionEstimator, TimeEstimation};
pub use template::{WorkflowTemplate, TemplateStep, sample_tracker};
