//! Finished clip models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::JobId;

/// File name of the `index`-th (1-based) raw extracted clip.
pub fn raw_clip_file_name(index: usize) -> String {
    format!("raw_clip{}.mp4", index)
}

/// File name of the `index`-th (1-based) finished clip.
pub fn clip_file_name(index: usize) -> String {
    format!("clip{}.mp4", index)
}

/// A captioned, watermarked and scored clip returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FinalClip {
    /// URL the clip is served from
    pub video_url: String,

    /// Text of the highlight the clip was cut from
    pub subtitle: String,

    /// Naive virality score (0-100)
    pub score: u8,
}

impl FinalClip {
    /// Build the finished clip entry for the `index`-th (1-based) clip of a job.
    pub fn new(job_id: &JobId, index: usize, subtitle: impl Into<String>, score: u8) -> Self {
        Self {
            video_url: format!("/clips/{}/{}", job_id, clip_file_name(index)),
            subtitle: subtitle.into(),
            score: score.min(100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names_are_one_based() {
        assert_eq!(raw_clip_file_name(1), "raw_clip1.mp4");
        assert_eq!(clip_file_name(5), "clip5.mp4");
    }

    #[test]
    fn test_final_clip_url() {
        let job_id = JobId::from_string("abc");
        let clip = FinalClip::new(&job_id, 2, "wow", 250);
        assert_eq!(clip.video_url, "/clips/abc/clip2.mp4");
        assert_eq!(clip.score, 100);
    }
}
