//! Job types for the queue.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ecut_models::JobId;

/// Job to turn an uploaded video into final clips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessVideoJob {
    /// Job ID assigned at upload
    pub job_id: JobId,
    /// Saved upload on local disk
    pub video_path: PathBuf,
    /// When the job was created
    pub created_at: DateTime<Utc>,
}

impl ProcessVideoJob {
    pub fn new(job_id: JobId, video_path: impl Into<PathBuf>) -> Self {
        Self {
            job_id,
            video_path: video_path.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_serialization() {
        let job = ProcessVideoJob::new(JobId::from_string("abc"), "/data/videos/abc.mp4");
        let json = serde_json::to_string(&job).unwrap();
        assert!(json.contains("\"job_id\":\"abc\""));

        let parsed: ProcessVideoJob = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, job);
    }
}
