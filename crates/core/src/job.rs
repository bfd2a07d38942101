//! Job model - the persisted form of one tracked service job.

use serde::{Deserialize, Serialize};
use crate::id::{JobId, StepId};
use crate::step::Step;
use crate::Time;

/// Tracker configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackerPolicy {
    /// Allow a pending step to be marked completed without an in-progress phase
    #[serde(default)]
    pub allow_direct_completion: bool,
}

impl TrackerPolicy {
    /// Policy that permits `Pending -> Completed`.
    pub fn permissive() -> Self {
        Self {
            allow_direct_completion: true,
        }
    }
}

/// A service job as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    /// Unique identifier
    pub id: JobId,

    /// Human readable label (plate number, customer name, ...)
    pub label: String,

    /// Tracker configuration
    #[serde(default)]
    pub policy: TrackerPolicy,

    /// Steps in creation order
    pub steps: Vec<Step>,

    /// Durations recorded for in-progress steps, applied on completion
    #[serde(default)]
    pub staged_durations: Vec<(StepId, u32)>,

    /// Created at
    pub created_at: Time,

    /// Last update
    pub updated_at: Time,
}
