//! Errors raised by step tracking operations.

use crate::id::StepId;
use crate::step::StepStatus;

/// Result alias for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors that can occur while building or mutating a tracker.
///
/// A failed operation never leaves a tracker partially updated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    /// The referenced step is not part of the tracker
    #[error("Unknown step: {0}")]
    UnknownStep(StepId),

    /// The step is already completed
    #[error("Step {0} is already completed")]
    TerminalState(StepId),

    /// A duration was zero or negative
    #[error("Invalid duration: {0} minutes (must be positive)")]
    InvalidDuration(i64),

    /// The requested transition breaks the forward-only state machine
    #[error("Invalid transition for step {id}: {from} -> {to}")]
    InvalidTransition {
        /// Step being moved
        id: StepId,
        /// Current status
        from: StepStatus,
        /// Requested status
        to: StepStatus,
    },

    /// A tracker needs at least one step
    #[error("A workflow must contain at least one step")]
    EmptyWorkflow,

    /// The same step id appears twice
    #[error("Duplicate step: {0}")]
    DuplicateStep(StepId),

    /// A step was seeded with inconsistent data
    #[error("Invalid step {id}: {reason}")]
    InvalidStep {
        /// Offending step
        id: StepId,
        /// What is wrong with it
        reason: String,
    },
}
