//! Worker metrics.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const JOBS_TOTAL: &str = "ecut_jobs_total";
    pub const JOB_DURATION_SECONDS: &str = "ecut_job_duration_seconds";
    pub const CLIPS_RENDERED_TOTAL: &str = "ecut_clips_rendered_total";
}

/// Record a job reaching a terminal status.
pub fn record_job_finished(status: &str, duration_secs: f64) {
    let labels = [("status", status.to_string())];
    counter!(names::JOBS_TOTAL, &labels).increment(1);
    histogram!(names::JOB_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a finished clip.
pub fn record_clip_rendered() {
    counter!(names::CLIPS_RENDERED_TOTAL).increment(1);
}
