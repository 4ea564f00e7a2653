//! SRT subtitle writing.

use std::fmt::Write as _;
use std::path::Path;

use tracing::debug;

use ecut_models::{format_srt_timestamp, Segment};

use crate::error::MediaResult;

/// Render segments as SRT text, one block per segment.
pub fn render_srt(segments: &[Segment]) -> String {
    let mut srt = String::new();
    for (idx, seg) in segments.iter().enumerate() {
        // Writing to a String cannot fail
        let _ = write!(
            srt,
            "{}\n{} --> {}\n{}\n\n",
            idx + 1,
            format_srt_timestamp(seg.start),
            format_srt_timestamp(seg.end),
            seg.text.trim()
        );
    }
    srt
}

/// Write the full transcript to `path` as SRT, replacing any existing file.
pub async fn write_srt(segments: &[Segment], path: &Path) -> MediaResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    tokio::fs::write(path, render_srt(segments)).await?;
    debug!(path = %path.display(), segments = segments.len(), "Wrote SRT");
    Ok(())
}
