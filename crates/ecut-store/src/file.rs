//! JSON-file job store.
//!
//! One file per job at `{jobs_dir}/{job_id}.json`, holding the serialized
//! [`JobRecord`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use ecut_models::{JobId, JobRecord};

use crate::error::{StoreError, StoreResult};
use crate::store::JobStore;

/// Job records persisted as JSON files in a directory.
#[derive(Debug, Clone)]
pub struct FileJobStore {
    dir: PathBuf,
}

impl FileJobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the records live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, job_id: &JobId) -> StoreResult<PathBuf> {
        let key = job_id.as_str();
        if key.is_empty()
            || key.starts_with('.')
            || key.contains(|c: char| c == '/' || c == '\\')
            || key.contains("..")
        {
            return Err(StoreError::invalid_key(key));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl JobStore for FileJobStore {
    async fn get(&self, job_id: &JobId) -> StoreResult<Option<JobRecord>> {
        let path = self.record_path(job_id)?;
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record = serde_json::from_slice(&raw).map_err(|e| StoreError::Corrupt {
            key: job_id.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(record))
    }

    async fn set(&self, job_id: &JobId, record: &JobRecord) -> StoreResult<()> {
        let path = self.record_path(job_id)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        // Write then rename so readers never see a partial record
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(record)?).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(job_id = %job_id, status = %record.status, "Persisted job record");
        Ok(())
    }

    async fn exists(&self, job_id: &JobId) -> StoreResult<bool> {
        let path = self.record_path(job_id)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecut_models::{FinalClip, JobStatus};

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileJobStore::new(dir.path().join("jobs"));
        let job_id = JobId::from_string("abc");

        assert!(store.get(&job_id).await.unwrap().is_none());

        let clip = FinalClip::new(&job_id, 1, "wow", 87);
        store.set(&job_id, &JobRecord::done(vec![clip.clone()])).await.unwrap();

        let record = store.get(&job_id).await.unwrap().unwrap();
        assert_eq!(record.status, JobStatus::Done);
        assert_eq!(record.clips, vec![clip]);
        assert!(store.exists(&job_id).await.unwrap());
        assert!(!dir.path().join("jobs").join("abc.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_file_store_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileJobStore::new(dir.path());

        for key in ["../escape", "a/b", ".hidden", ""] {
            let result = store.get(&JobId::from_string(key)).await;
            assert!(matches!(result, Err(StoreError::InvalidKey(_))), "key {key:?}");
        }
    }

    #[tokio::test]
    async fn test_file_store_corrupt_record() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), b"{not json").unwrap();

        let store = FileJobStore::new(dir.path());
        let result = store.get(&JobId::from_string("bad")).await;
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }
}
