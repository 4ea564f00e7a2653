//! Transcript segment model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a segment fails validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SegmentError {
    #[error("segment time is not a finite number")]
    NonFinite,

    #[error("segment starts before zero: {0}")]
    NegativeStart(f64),

    #[error("segment end {end} is not after start {start}")]
    EmptyRange { start: f64, end: f64 },
}

/// One timestamped unit of transcribed speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,

    /// Spoken text
    #[serde(default)]
    pub text: String,
}

impl Segment {
    /// Create a new segment.
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Length of the segment in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Check the `0 <= start < end` invariant.
    pub fn validate(&self) -> Result<(), SegmentError> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(SegmentError::NonFinite);
        }
        if self.start < 0.0 {
            return Err(SegmentError::NegativeStart(self.start));
        }
        if self.end <= self.start {
            return Err(SegmentError::EmptyRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Whether the segment satisfies its invariant.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
