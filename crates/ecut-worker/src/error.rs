//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("Media error: {0}")]
    Media(#[from] ecut_media::MediaError),

    #[error("Store error: {0}")]
    Store(#[from] ecut_store::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn job_failed(msg: impl Into<String>) -> Self {
        Self::JobFailed(msg.into())
    }

    /// Whether an external media tool failed, as opposed to local IO.
    pub fn is_rendering_failure(&self) -> bool {
        matches!(self, WorkerError::Media(e) if e.is_rendering_failure())
    }
}
