//! Completion time estimation.

use chrono::{DateTime, Duration, Utc};
use wraptrack_core::StepStatus;
use crate::tracker::ProgressTracker;

/// Time summary for a tracked job.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeEstimation {
    /// Minutes still expected for unfinished steps
    pub remaining_minutes: u64,

    /// Minutes actually spent on completed steps
    pub spent_minutes: u64,

    /// Actual minus estimated minutes over completed steps
    pub variance_minutes: i64,

    /// When the job is expected to be done
    pub estimated_completion: DateTime<Utc>,
}

/// Completion time estimator.
pub struct CompletionEstimator;

impl CompletionEstimator {
    /// Estimate completion from `now`.
    pub fn estimate(&self, tracker: &ProgressTracker, now: DateTime<Utc>) -> TimeEstimation {
        let mut remaining = 0u64;
        let mut spent = 0u64;
        let mut variance = 0i64;

        for step in tracker.steps_view() {
            match step.status {
                StepStatus::Completed => {
                    let actual = step.display_minutes();
                    spent += u64::from(actual);
                    variance += i64::from(actual) - i64::from(step.estimated_duration);
                }
                // No start timestamps: in-progress steps count their full estimate.
                StepStatus::InProgress | StepStatus::Pending => {
                    remaining += u64::from(step.estimated_duration);
                }
            }
        }

        TimeEstimation {
            remaining_minutes: remaining,
            spent_minutes: spent,
            variance_minutes: variance,
            estimated_completion: now + Duration::minutes(remaining as i64),
        }
    }
}

impl Default for CompletionEstimator {
    fn default() -> Self {
        Self
    }
}
