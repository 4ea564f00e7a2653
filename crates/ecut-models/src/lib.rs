//! Shared data models for the EchoCut backend.
//!
//! This crate provides Serde-serializable types for:
//! - Transcript segments and selected highlights
//! - Finished clips and job records
//! - SRT timestamp formatting

pub mod clip;
pub mod highlight;
pub mod job;
pub mod segment;
pub mod timestamp;

// Re-export common types
pub use clip::{clip_file_name, raw_clip_file_name, FinalClip};
pub use highlight::Highlight;
pub use job::{JobId, JobRecord, JobStatus};
pub use segment::{Segment, SegmentError};
pub use timestamp::format_srt_timestamp;
