//! Job store interface.

use async_trait::async_trait;
use tracing::debug;

use ecut_models::{JobId, JobRecord};

use crate::error::StoreResult;
use crate::memory::MemoryJobStore;

/// Key-value store of job records keyed by job ID.
///
/// Readers must treat a missing record as "unknown job"; the pipeline only
/// ever performs the terminal write.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Fetch a record, `None` if the job is unknown.
    async fn get(&self, job_id: &JobId) -> StoreResult<Option<JobRecord>>;

    /// Create or replace a record.
    async fn set(&self, job_id: &JobId, record: &JobRecord) -> StoreResult<()>;

    /// Whether a record exists for the job.
    async fn exists(&self, job_id: &JobId) -> StoreResult<bool> {
        Ok(self.get(job_id).await?.is_some())
    }
}

/// In-memory table with a persistent fallback.
///
/// Writes go to both layers. Reads are served from memory and fall back to
/// the persistent backend, warming the memory layer on a hit, so records
/// survive a restart.
pub struct CachedJobStore<P> {
    memory: MemoryJobStore,
    persistent: P,
}

impl<P: JobStore> CachedJobStore<P> {
    pub fn new(persistent: P) -> Self {
        Self {
            memory: MemoryJobStore::new(),
            persistent,
        }
    }
}

#[async_trait]
impl<P: JobStore> JobStore for CachedJobStore<P> {
    async fn get(&self, job_id: &JobId) -> StoreResult<Option<JobRecord>> {
        if let Some(record) = self.memory.get(job_id).await? {
            return Ok(Some(record));
        }

        let record = self.persistent.get(job_id).await?;
        if let Some(ref record) = record {
            debug!(job_id = %job_id, "Loaded job record from persistent store");
            self.memory.set(job_id, record).await?;
        }
        Ok(record)
    }

    async fn set(&self, job_id: &JobId, record: &JobRecord) -> StoreResult<()> {
        self.persistent.set(job_id, record).await?;
        self.memory.set(job_id, record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::FileJobStore;
    use ecut_models::JobStatus;

    #[tokio::test]
    async fn test_cached_store_falls_back_to_persistent() {
        let dir = tempfile::tempdir().unwrap();
        let job_id = JobId::from_string("job-1");

        // Simulate a record written before a restart
        FileJobStore::new(dir.path())
            .set(&job_id, &JobRecord::done(vec![]))
            .await
            .unwrap();

        let store = CachedJobStore::new(FileJobStore::new(dir.path()));
        let record = store.get(&job_id).await.unwrap().unwrap();
        assert_eq!(record.status, JobStatus::Done);
        assert!(store.memory.exists(&job_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_cached_store_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let job_id = JobId::from_string("job-2");
        let store = CachedJobStore::new(FileJobStore::new(dir.path()));

        store.set(&job_id, &JobRecord::processing()).await.unwrap();
        assert!(dir.path().join("job-2.json").exists());
        assert!(store.exists(&job_id).await.unwrap());
        assert!(!store.exists(&JobId::from_string("other")).await.unwrap());
    }
}
