//! Storage trait abstraction.

use async_trait::async_trait;
use wraptrack_core::{JobId, JobRecord, TrackerError};
use wraptrack_progress::ProgressTracker;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Stored job failed tracker validation
    #[error("Invalid job data: {0}")]
    Tracker(#[from] TrackerError),
}

/// Storage abstraction for service jobs.
///
/// This trait allows different storage backends to be plugged in.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Save a job (create or update).
    async fn save_job(&mut self, job: &JobRecord) -> Result<()>;

    /// Load a job by ID.
    async fn load_job(&self, id: JobId) -> Result<Option<JobRecord>>;

    /// List all jobs, oldest first.
    async fn list_jobs(&self) -> Result<Vec<JobRecord>>;

    /// Delete a job.
    async fn delete_job(&mut self, id: JobId) -> Result<()>;

    /// Load a job and rebuild its tracker.
    async fn load_tracker(&self, id: JobId) -> Result<(JobRecord, ProgressTracker)> {
        let job = self
            .load_job(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("job {}", id)))?;
        let tracker = ProgressTracker::from_record(&job)?;
        Ok((job, tracker))
    }
}
