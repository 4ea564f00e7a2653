//! Bounded in-process job queue.
//!
//! The API holds [`JobSender`]s; the worker owns the single [`JobQueue`]
//! consumer. Once every sender is dropped and the buffer drains, `recv`
//! returns `None`.

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{QueueError, QueueResult};
use crate::job::ProcessVideoJob;

/// Queue configuration.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Maximum jobs buffered before `enqueue` waits
    pub capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

impl QueueConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            capacity: std::env::var("QUEUE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&c: &usize| c > 0)
                .unwrap_or(256),
        }
    }
}

/// Producer side of the queue.
#[derive(Debug, Clone)]
pub struct JobSender {
    tx: mpsc::Sender<ProcessVideoJob>,
}

impl JobSender {
    /// Enqueue a job, waiting for buffer space if the queue is full.
    pub async fn enqueue(&self, job: ProcessVideoJob) -> QueueResult<()> {
        let job_id = job.job_id.clone();
        self.tx.send(job).await.map_err(|_| QueueError::Closed)?;
        debug!(job_id = %job_id, "Enqueued job");
        Ok(())
    }

    /// Jobs waiting to be picked up.
    pub fn pending(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    /// Whether the consumer has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side of the queue.
#[derive(Debug)]
pub struct JobQueue {
    rx: mpsc::Receiver<ProcessVideoJob>,
}

impl JobQueue {
    /// Create a queue and its first sender.
    pub fn new(config: &QueueConfig) -> (JobSender, JobQueue) {
        let (tx, rx) = mpsc::channel(config.capacity.max(1));
        (JobSender { tx }, JobQueue { rx })
    }

    /// Wait for the next job. `None` once all senders are gone.
    pub async fn recv(&mut self) -> Option<ProcessVideoJob> {
        self.rx.recv().await
    }

    /// Stop accepting jobs. Buffered jobs can still be received.
    pub fn close(&mut self) {
        self.rx.close();
    }
}
