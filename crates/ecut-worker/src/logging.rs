//! Structured job logging.

use std::time::{Duration, Instant};

use tracing::{error, info, warn, Span};

use ecut_models::JobId;

/// Lifecycle logger for one job.
///
/// Every event carries `job_id` and `operation` fields; completion and
/// failure events also carry the elapsed time since the logger was created.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: String,
    operation: &'static str,
    started: Instant,
}

impl JobLogger {
    pub fn new(job_id: &JobId, operation: &'static str) -> Self {
        Self {
            job_id: job_id.to_string(),
            operation,
            started: Instant::now(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(job_id = %self.job_id, operation = self.operation, "Job started: {}", message);
    }

    /// Log entry into a pipeline stage.
    pub fn log_stage(&self, stage: &str, message: &str) {
        info!(
            job_id = %self.job_id,
            operation = self.operation,
            stage,
            "{}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(job_id = %self.job_id, operation = self.operation, "Job warning: {}", message);
    }

    pub fn log_error(&self, message: &str) {
        error!(
            job_id = %self.job_id,
            operation = self.operation,
            elapsed_ms = self.elapsed().as_millis() as u64,
            "Job failed: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            operation = self.operation,
            elapsed_ms = self.elapsed().as_millis() as u64,
            "Job completed: {}", message
        );
    }

    /// Time since the job started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Span to instrument the job's future with.
    pub fn span(&self) -> Span {
        tracing::info_span!("job", job_id = %self.job_id, operation = self.operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_logger() {
        let job_id = JobId::from_string("job-123");
        let logger = JobLogger::new(&job_id, "process_video");

        assert_eq!(logger.job_id(), "job-123");
        assert!(logger.elapsed() < Duration::from_secs(60));
        logger.log_stage("detect", "no highlights");
    }
}
