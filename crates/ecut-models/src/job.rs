//! Job identifiers and status records.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::FinalClip;

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Externally visible job status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Pipeline has been queued or is running
    #[default]
    Processing,
    /// All clips were rendered and scored
    Done,
    /// Pipeline failed; see the record's error
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Processing => "processing",
            JobStatus::Done => "done",
            JobStatus::Error => "error",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Job record returned by status queries.
///
/// Written once as `processing` at upload and once more with the
/// terminal outcome of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JobRecord {
    pub status: JobStatus,

    /// Finished clips in highlight order
    #[serde(default)]
    pub clips: Vec<FinalClip>,

    /// Failure description when `status` is `error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobRecord {
    /// Record for a job that has been accepted but not finished.
    pub fn processing() -> Self {
        Self {
            status: JobStatus::Processing,
            clips: Vec::new(),
            error: None,
        }
    }

    /// Record for a successfully finished job.
    pub fn done(clips: Vec<FinalClip>) -> Self {
        Self {
            status: JobStatus::Done,
            clips,
            error: None,
        }
    }

    /// Record for a failed job.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Error,
            clips: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Map a pipeline outcome onto its terminal record.
    pub fn from_outcome<E: fmt::Display>(outcome: &Result<Vec<FinalClip>, E>) -> Self {
        match outcome {
            Ok(clips) => Self::done(clips.clone()),
            Err(e) => Self::failed(e.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&JobStatus::Processing).unwrap(), "\"processing\"");
        assert_eq!(serde_json::to_string(&JobStatus::Done).unwrap(), "\"done\"");
        assert!(JobStatus::Error.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
    }

    #[test]
    fn test_record_from_outcome() {
        let job_id = JobId::from_string("j1");
        let ok: Result<Vec<FinalClip>, String> = Ok(vec![FinalClip::new(&job_id, 1, "wow", 70)]);
        let record = JobRecord::from_outcome(&ok);
        assert_eq!(record.status, JobStatus::Done);
        assert_eq!(record.clips.len(), 1);
        assert!(record.error.is_none());

        let err: Result<Vec<FinalClip>, String> = Err("FFmpeg exited".to_string());
        let record = JobRecord::from_outcome(&err);
        assert_eq!(record.status, JobStatus::Error);
        assert_eq!(record.error.as_deref(), Some("FFmpeg exited"));
        assert!(record.clips.is_empty());
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_value(JobRecord::processing()).unwrap();
        assert_eq!(json["status"], "processing");
        assert_eq!(json["clips"], serde_json::json!([]));
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_job_id_unique() {
        assert_ne!(JobId::new(), JobId::new());
    }
}
