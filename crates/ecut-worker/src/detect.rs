//! Keyword highlight detection.
//!
//! A segment is interesting when its text contains one of a fixed set of
//! excitement keywords. Interesting segments that sit closer than
//! [`MERGE_GAP_SECS`] are merged into one highlight, and at most
//! [`MAX_HIGHLIGHTS`] highlights are kept, earliest first.

use tracing::warn;

use ecut_models::{Highlight, Segment};

/// Words that mark a segment as a highlight (matched as lower-case substrings).
pub const HIGHLIGHT_KEYWORDS: [&str; 5] = ["wow", "amazing", "crazy", "awesome", "unbelievable"];

/// Highlights separated by less than this are merged (seconds).
pub const MERGE_GAP_SECS: f64 = 0.5;

/// Maximum number of highlights per transcript.
pub const MAX_HIGHLIGHTS: usize = 5;

fn contains_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    HIGHLIGHT_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Select, merge and cap highlights from a transcript.
///
/// Returns an empty list when nothing matches; choosing a fallback range is
/// left to the caller. Segments with non-finite times, a negative start or
/// an empty range are skipped with a warning.
pub fn detect_highlights(segments: &[Segment]) -> Vec<Highlight> {
    let mut selected: Vec<&Segment> = segments
        .iter()
        .filter(|seg| match seg.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!(start = seg.start, end = seg.end, "Skipping malformed segment: {}", e);
                false
            }
        })
        .filter(|seg| contains_keyword(&seg.text))
        .collect();

    // sort_by is stable, equal starts keep transcript order
    selected.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut highlights: Vec<Highlight> = Vec::new();
    for seg in selected {
        let next = Highlight::from(seg);
        match highlights.last_mut() {
            Some(current) if next.start - current.end < MERGE_GAP_SECS => {
                current.end = current.end.max(next.end);
                current.text.push(' ');
                current.text.push_str(&next.text);
            }
            _ => highlights.push(next),
        }
    }

    highlights.truncate(MAX_HIGHLIGHTS);
    highlights
}
