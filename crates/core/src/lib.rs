//! WrapTrack core data models.
//!
//! This crate defines the data structures shared by the service tracking
//! workspace: steps, their status machine, job records and tracker errors.

#![warn(missing_docs)]

// Core identities
mod id;

// Steps and jobs
mod step;
mod job;
mod error;

// Re-exports
pub use id::*;

pub use step::{Step, StepStatus, MediaRef, MediaKind};
pub use job::{JobRecord, TrackerPolicy};
pub use error::{TrackerError, Result};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
