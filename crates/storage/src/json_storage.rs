//! JSON file storage implementation.
//!
//! Stores one pretty-printed JSON file per job under `<root>/jobs/`.

use std::path::{Path, PathBuf};
use tokio::fs;
use wraptrack_core::{JobId, JobRecord};
use super::{JobStore, Result, StorageError};

/// File-based JSON storage backend.
pub struct JsonJobStore {
    root: PathBuf,
}

impl JsonJobStore {
    /// Create storage, creating the `jobs/` directory if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("jobs")).await?;
        tracing::debug!("Opened job store at {}", root.display());
        Ok(Self { root })
    }

    fn job_path(&self, id: JobId) -> PathBuf {
        self.root.join("jobs").join(format!("{}.json", id))
    }
}

#[async_trait::async_trait]
impl JobStore for JsonJobStore {
    async fn save_job(&mut self, job: &JobRecord) -> Result<()> {
        let path = self.job_path(job.id);
        let json = serde_json::to_string_pretty(job)?;

        // Write then rename so a crash never leaves a half-written job.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json.as_bytes()).await?;
        fs::rename(&tmp, &path).await?;

        tracing::debug!("Saved job {}", job.id);
        Ok(())
    }

    async fn load_job(&self, id: JobId) -> Result<Option<JobRecord>> {
        read_json(&self.job_path(id)).await
    }

    async fn list_jobs(&self) -> Result<Vec<JobRecord>> {
        let mut jobs: Vec<JobRecord> = list_dir(&self.root.join("jobs")).await?;
        jobs.sort_by_key(|j| (j.created_at, j.id));
        Ok(jobs)
    }

    async fn delete_job(&mut self, id: JobId) -> Result<()> {
        match fs::remove_file(self.job_path(id)).await {
            Ok(()) => {
                tracing::info!("Deleted job {}", id);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(format!("job {}", id)))
            }
            Err(e) => Err(e.into()),
        }
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_json(&entry.path()).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => tracing::warn!("Skipping unreadable job file {}: {}", entry.path().display(), e),
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use wraptrack_core::{StepStatus, TrackerPolicy};
    use wraptrack_progress::WorkflowTemplate;

    fn create_test_job(label: &str) -> JobRecord {
        let now = Utc::now();
        JobRecord {
            id: JobId::new(),
            label: label.to_string(),
            policy: TrackerPolicy::default(),
            steps: WorkflowTemplate::car_wrap().instantiate(),
            staged_durations: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonJobStore::new(dir.path()).await.unwrap();

        let job = create_test_job("ABC-1234");
        store.save_job(&job).await.unwrap();

        let loaded = store.load_job(job.id).await.unwrap().unwrap();
        assert_eq!(loaded.label, "ABC-1234");
        assert_eq!(loaded.steps, job.steps);
        assert!(store.load_job(JobId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonJobStore::new(dir.path()).await.unwrap();

        let first = create_test_job("first");
        let second = create_test_job("second");
        store.save_job(&first).await.unwrap();
        store.save_job(&second).await.unwrap();
        fs::write(dir.path().join("jobs").join("notes.txt"), b"ignored").await.unwrap();

        assert_eq!(store.list_jobs().await.unwrap().len(), 2);

        store.delete_job(first.id).await.unwrap();
        let jobs = store.list_jobs().await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, second.id);

        assert!(matches!(
            store.delete_job(first.id).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_load_tracker_persists_progress() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonJobStore::new(dir.path()).await.unwrap();
        let job = create_test_job("XYZ-9");
        store.save_job(&job).await.unwrap();

        let (mut record, mut tracker) = store.load_tracker(job.id).await.unwrap();
        let first = tracker.step_at(0).unwrap().id;
        tracker.advance(first).unwrap();
        tracker.write_record(&mut record);
        store.save_job(&record).await.unwrap();

        let (_, reloaded) = store.load_tracker(job.id).await.unwrap();
        assert_eq!(reloaded.step(first).unwrap().status, StepStatus::InProgress);
        assert!((reloaded.progress_percent() - 10.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_load_tracker_rejects_invalid_job() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonJobStore::new(dir.path()).await.unwrap();

        let mut job = create_test_job("broken");
        job.steps.clear();
        store.save_job(&job).await.unwrap();

        assert!(matches!(
            store.load_tracker(job.id).await,
            Err(StorageError::Tracker(_))
        ));
        assert!(matches!(
            store.load_tracker(JobId::new()).await,
            Err(StorageError::NotFound(_))
        ));
    }
}
