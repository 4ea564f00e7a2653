//! Raw clip extraction.
//!
//! Each highlight becomes one independently encoded file named
//! `raw_clip{i}.mp4` (1-based, highlight order). Renders run one after
//! another; the first failure aborts the extraction and leaves any clips
//! already written in place for the caller to clean up.

use std::path::{Path, PathBuf};

use tracing::info;

use ecut_models::{raw_clip_file_name, Highlight};

use crate::command::FfmpegCommand;
use crate::encoding::EncodingConfig;
use crate::error::{MediaError, MediaResult};
use crate::renderer::MediaRenderer;

/// Build the trim-and-encode render for one highlight.
pub fn extract_clip_command(
    video: &Path,
    highlight: &Highlight,
    output: &Path,
    encoding: &EncodingConfig,
) -> FfmpegCommand {
    FfmpegCommand::new(video, output)
        .seek(highlight.start)
        .duration(highlight.duration())
        .encoding(encoding)
}

/// Cut every highlight out of `video` into `output_dir`.
///
/// # Returns
/// Paths of the raw clips, one per highlight, in highlight order.
pub async fn extract_clips(
    renderer: &dyn MediaRenderer,
    video: &Path,
    highlights: &[Highlight],
    output_dir: &Path,
    encoding: &EncodingConfig,
) -> MediaResult<Vec<PathBuf>> {
    if !video.exists() {
        return Err(MediaError::FileNotFound(video.to_path_buf()));
    }

    tokio::fs::create_dir_all(output_dir).await?;

    let mut clip_paths = Vec::with_capacity(highlights.len());
    for (idx, highlight) in highlights.iter().enumerate() {
        let output = output_dir.join(raw_clip_file_name(idx + 1));

        info!(
            "Extracting clip {}: {} -> {} (start: {:.2}s, duration: {:.2}s)",
            idx + 1,
            video.display(),
            output.display(),
            highlight.start,
            highlight.duration()
        );

        let cmd = extract_clip_command(video, highlight, &output, encoding);
        renderer.render(&cmd).await?;
        clip_paths.push(output);
    }

    Ok(clip_paths)
}
