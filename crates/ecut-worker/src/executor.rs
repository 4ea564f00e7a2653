//! Job executor.

use std::sync::Arc;

use tokio::sync::{watch, Semaphore};
use tracing::{error, info};

use ecut_models::JobRecord;
use ecut_queue::{JobQueue, ProcessVideoJob};
use ecut_store::JobStore;

use crate::error::{WorkerError, WorkerResult};
use crate::metrics::record_job_finished;
use crate::pipeline::{process_video, ProcessingContext};

/// Runs queued jobs with bounded concurrency.
///
/// Each job is one tokio task. The executor writes exactly one terminal
/// record per job; the `processing` record is written by whoever enqueued it.
pub struct JobExecutor {
    ctx: ProcessingContext,
    store: Arc<dyn JobStore>,
    job_semaphore: Arc<Semaphore>,
    max_concurrent_jobs: usize,
    shutdown: watch::Sender<bool>,
}

impl JobExecutor {
    pub fn new(ctx: ProcessingContext, store: Arc<dyn JobStore>) -> Self {
        let max_concurrent_jobs = ctx.config.max_concurrent_jobs.max(1);
        let (shutdown, _) = watch::channel(false);

        Self {
            ctx,
            store,
            job_semaphore: Arc::new(Semaphore::new(max_concurrent_jobs)),
            max_concurrent_jobs,
            shutdown,
        }
    }

    /// Ask `run` to stop taking new jobs.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// Consume the queue until it closes or shutdown is requested, then wait
    /// for in-flight jobs up to the configured shutdown timeout.
    pub async fn run(&self, mut queue: JobQueue) -> WorkerResult<()> {
        info!(
            "Starting job executor with {} max concurrent jobs",
            self.max_concurrent_jobs
        );

        let mut shutdown_rx = self.shutdown.subscribe();

        loop {
            let permit = tokio::select! {
                _ = shutdown_rx.wait_for(|stop| *stop) => {
                    info!("Shutdown signal received, stopping executor");
                    break;
                }
                permit = Arc::clone(&self.job_semaphore).acquire_owned() => {
                    permit.map_err(|_| WorkerError::job_failed("Semaphore closed"))?
                }
            };

            let job = tokio::select! {
                _ = shutdown_rx.wait_for(|stop| *stop) => {
                    info!("Shutdown signal received, stopping executor");
                    break;
                }
                job = queue.recv() => match job {
                    Some(job) => job,
                    None => {
                        info!("Job queue closed, stopping executor");
                        break;
                    }
                },
            };

            let ctx = self.ctx.clone();
            let store = Arc::clone(&self.store);
            tokio::spawn(async move {
                let _permit = permit;
                Self::execute_job(ctx, store, job).await;
            });
        }

        info!("Waiting for in-flight jobs to complete...");
        let drained = tokio::time::timeout(
            self.ctx.config.shutdown_timeout,
            self.job_semaphore.acquire_many(self.max_concurrent_jobs as u32),
        )
        .await;
        if drained.is_err() {
            error!("Timed out waiting for in-flight jobs");
        }

        info!("Job executor stopped");
        Ok(())
    }

    /// Run one job and record its outcome.
    ///
    /// The pipeline runs in its own task so that a panic still ends in an
    /// `error` record.
    async fn execute_job(ctx: ProcessingContext, store: Arc<dyn JobStore>, job: ProcessVideoJob) {
        let started = std::time::Instant::now();
        info!(job_id = %job.job_id, "Executing job");

        let pipeline = {
            let job = job.clone();
            tokio::spawn(async move { process_video(&ctx, &job.job_id, &job.video_path).await })
        };
        let outcome = match pipeline.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(job_id = %job.job_id, "Job task aborted: {}", e);
                Err(WorkerError::job_failed(format!("Job task aborted: {}", e)))
            }
        };
        let record = JobRecord::from_outcome(&outcome);

        if let Ok(clips) = &outcome {
            info!(job_id = %job.job_id, clips = clips.len(), "Job done");
        }
        record_job_finished(record.status.as_str(), started.elapsed().as_secs_f64());

        if let Err(e) = store.set(&job.job_id, &record).await {
            error!(job_id = %job.job_id, "Failed to store job outcome: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use async_trait::async_trait;
    use ecut_media::renderer::testing::RecordingRenderer;
    use ecut_media::{MediaResult, Transcriber};
    use ecut_models::{JobId, JobStatus, Segment};
    use ecut_queue::QueueConfig;
    use ecut_store::MemoryJobStore;

    use crate::config::WorkerConfig;
    use crate::score::SeededRandom;

    struct FixedTranscriber;

    #[async_trait]
    impl Transcriber for FixedTranscriber {
        async fn transcribe(&self, _video: &Path) -> MediaResult<Vec<Segment>> {
            Ok(vec![Segment::new(1.0, 3.0, "that was crazy")])
        }
    }

    struct PanickingTranscriber;

    #[async_trait]
    impl Transcriber for PanickingTranscriber {
        async fn transcribe(&self, _video: &Path) -> MediaResult<Vec<Segment>> {
            panic!("transcriber crashed");
        }
    }

    fn executor(config: WorkerConfig, store: Arc<MemoryJobStore>) -> JobExecutor {
        let ctx = ProcessingContext::new(
            config,
            Arc::new(RecordingRenderer::new()),
            Arc::new(FixedTranscriber),
            Arc::new(SeededRandom::new(9)),
        );
        JobExecutor::new(ctx, store)
    }

    #[tokio::test]
    async fn test_executor_records_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let config = WorkerConfig::with_data_dir(dir.path());
        config.ensure_dirs().await.unwrap();

        let good_video = config.videos_dir.join("good.mp4");
        std::fs::write(&good_video, b"video").unwrap();

        let store = Arc::new(MemoryJobStore::new());
        let (sender, queue) = JobQueue::new(&QueueConfig::default());

        let good = JobId::from_string("good");
        let missing = JobId::from_string("missing");
        sender.enqueue(ProcessVideoJob::new(good.clone(), good_video)).await.unwrap();
        sender
            .enqueue(ProcessVideoJob::new(
                missing.clone(),
                config.videos_dir.join("missing.mp4"),
            ))
            .await
            .unwrap();
        drop(sender);

        executor(config, store.clone()).run(queue).await.unwrap();

        let record = store.get(&good).await.unwrap().unwrap();
        assert_eq!(record.status, JobStatus::Done);
        assert_eq!(record.clips.len(), 1);
        assert_eq!(record.clips[0].subtitle, "that was crazy");

        let record = store.get(&missing).await.unwrap().unwrap();
        assert_eq!(record.status, JobStatus::Error);
        assert!(record.clips.is_empty());
        assert!(record.error.unwrap().contains("missing.mp4"));
    }

    #[tokio::test]
    async fn test_shutdown_stops_idle_executor() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryJobStore::new());
        let (_sender, queue) = JobQueue::new(&QueueConfig::default());

        let executor = executor(WorkerConfig::with_data_dir(dir.path()), store.clone());
        executor.shutdown();

        tokio::time::timeout(std::time::Duration::from_secs(5), executor.run(queue))
            .await
            .unwrap()
            .unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_panicking_job_is_recorded_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = WorkerConfig::with_data_dir(dir.path());
        config.ensure_dirs().await.unwrap();

        let video = config.videos_dir.join("boom.mp4");
        std::fs::write(&video, b"video").unwrap();

        let store = Arc::new(MemoryJobStore::new());
        let ctx = ProcessingContext::new(
            config,
            Arc::new(RecordingRenderer::new()),
            Arc::new(PanickingTranscriber),
            Arc::new(SeededRandom::new(9)),
        );

        let (sender, queue) = JobQueue::new(&QueueConfig::default());
        let job_id = JobId::from_string("boom");
        sender.enqueue(ProcessVideoJob::new(job_id.clone(), video)).await.unwrap();
        drop(sender);

        JobExecutor::new(ctx, store.clone()).run(queue).await.unwrap();

        let record = store.get(&job_id).await.unwrap().unwrap();
        assert_eq!(record.status, JobStatus::Error);
        assert!(record.clips.is_empty());
        assert!(record.error.unwrap().contains("Job task aborted"));
    }
}
