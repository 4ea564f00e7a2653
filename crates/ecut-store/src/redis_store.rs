//! Redis-backed job store.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use ecut_models::{JobId, JobRecord};

use crate::error::{StoreError, StoreResult};
use crate::store::JobStore;

/// Default key prefix for job records.
pub const DEFAULT_KEY_PREFIX: &str = "ecut:job:";

/// Job records stored as JSON strings in Redis.
#[derive(Clone)]
pub struct RedisJobStore {
    client: redis::Client,
    key_prefix: String,
    /// Expiry applied on every write, `None` keeps records forever
    ttl_secs: Option<u64>,
}

impl RedisJobStore {
    /// Create a store from a Redis URL.
    pub fn new(redis_url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self {
            client,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            ttl_secs: None,
        })
    }

    /// Expire records `secs` after their last write.
    pub fn with_ttl(mut self, secs: u64) -> Self {
        self.ttl_secs = Some(secs);
        self
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    fn key(&self, job_id: &JobId) -> String {
        format!("{}{}", self.key_prefix, job_id)
    }
}

#[async_trait]
impl JobStore for RedisJobStore {
    async fn get(&self, job_id: &JobId) -> StoreResult<Option<JobRecord>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(self.key(job_id)).await?;

        raw.map(|raw| {
            serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
                key: self.key(job_id),
                message: e.to_string(),
            })
        })
        .transpose()
    }

    async fn set(&self, job_id: &JobId, record: &JobRecord) -> StoreResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload = serde_json::to_string(record)?;

        match self.ttl_secs {
            Some(ttl) => conn.set_ex::<_, _, ()>(self.key(job_id), payload, ttl).await?,
            None => conn.set::<_, _, ()>(self.key(job_id), payload).await?,
        }

        debug!(job_id = %job_id, status = %record.status, "Stored job record in Redis");
        Ok(())
    }

    async fn exists(&self, job_id: &JobId) -> StoreResult<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        Ok(conn.exists(self.key(job_id)).await?)
    }
}
