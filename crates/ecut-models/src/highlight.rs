//! Highlight models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Segment;

/// Length of the fallback highlight used when nothing was detected.
pub const FALLBACK_HIGHLIGHT_SECS: f64 = 15.0;

/// A selected, possibly merged, time range chosen for clipping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Highlight {
    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,

    /// Text spoken within the range
    #[serde(default)]
    pub text: String,
}

impl Highlight {
    /// Create a new highlight.
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// The opening range clipped when a transcript yields no highlights.
    pub fn fallback() -> Self {
        Self::new(0.0, FALLBACK_HIGHLIGHT_SECS, "")
    }

    /// Length of the range in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

impl From<&Segment> for Highlight {
    fn from(segment: &Segment) -> Self {
        Self::new(segment.start, segment.end, segment.text.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_covers_opening() {
        let h = Highlight::fallback();
        assert_eq!(h.start, 0.0);
        assert_eq!(h.end, 15.0);
        assert!(h.text.is_empty());
    }

    #[test]
    fn test_from_segment_trims_text() {
        let seg = Segment::new(1.0, 3.0, "  that was crazy ");
        let h = Highlight::from(&seg);
        assert_eq!(h.text, "that was crazy");
        assert!((h.duration() - 2.0).abs() < 1e-9);
    }
}
