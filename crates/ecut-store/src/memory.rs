//! In-memory job store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use ecut_models::{JobId, JobRecord};

use crate::error::StoreResult;
use crate::store::JobStore;

/// Job records held in a process-local map.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    records: RwLock<HashMap<JobId, JobRecord>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Snapshot of every record held.
    pub async fn records(&self) -> Vec<(JobId, JobRecord)> {
        self.records
            .read()
            .await
            .iter()
            .map(|(id, record)| (id.clone(), record.clone()))
            .collect()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn get(&self, job_id: &JobId) -> StoreResult<Option<JobRecord>> {
        Ok(self.records.read().await.get(job_id).cloned())
    }

    async fn set(&self, job_id: &JobId, record: &JobRecord) -> StoreResult<()> {
        self.records
            .write()
            .await
            .insert(job_id.clone(), record.clone());
        Ok(())
    }

    async fn exists(&self, job_id: &JobId) -> StoreResult<bool> {
        Ok(self.records.read().await.contains_key(job_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecut_models::JobStatus;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryJobStore::new();
        let job_id = JobId::new();

        assert!(store.get(&job_id).await.unwrap().is_none());
        assert!(!store.exists(&job_id).await.unwrap());

        store.set(&job_id, &JobRecord::processing()).await.unwrap();
        store.set(&job_id, &JobRecord::failed("boom")).await.unwrap();

        let record = store.get(&job_id).await.unwrap().unwrap();
        assert_eq!(record.status, JobStatus::Error);
        assert_eq!(store.len().await, 1);
    }
}
