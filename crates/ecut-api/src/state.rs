//! Application state.

use std::sync::Arc;

use tracing::info;

use ecut_queue::JobSender;
use ecut_store::{CachedJobStore, FileJobStore, JobStore, MemoryJobStore, RedisJobStore, StoreResult};
use ecut_worker::WorkerConfig;

use crate::config::{ApiConfig, JobStoreKind};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    /// Data directory layout shared with the worker
    pub worker: Arc<WorkerConfig>,
    pub store: Arc<dyn JobStore>,
    pub jobs: JobSender,
}

impl AppState {
    pub fn new(
        config: ApiConfig,
        worker: WorkerConfig,
        store: Arc<dyn JobStore>,
        jobs: JobSender,
    ) -> Self {
        Self {
            config,
            worker: Arc::new(worker),
            store,
            jobs,
        }
    }
}

/// Build the configured job store.
pub fn build_store(config: &ApiConfig, worker: &WorkerConfig) -> StoreResult<Arc<dyn JobStore>> {
    let store: Arc<dyn JobStore> = match config.job_store {
        JobStoreKind::File => {
            info!("Job store: files in {}", worker.jobs_dir.display());
            Arc::new(CachedJobStore::new(FileJobStore::new(&worker.jobs_dir)))
        }
        JobStoreKind::Memory => {
            info!("Job store: memory");
            Arc::new(MemoryJobStore::new())
        }
        JobStoreKind::Redis => {
            info!("Job store: redis");
            let mut store = RedisJobStore::new(&config.redis_url)?;
            if let Some(ttl) = config.job_record_ttl_secs {
                store = store.with_ttl(ttl);
            }
            Arc::new(store)
        }
    };
    Ok(store)
}
