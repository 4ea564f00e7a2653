//! Caption and watermark post-processing.

use std::path::Path;

use tracing::{debug, info};

use crate::command::FfmpegCommand;
use crate::encoding::EncodingConfig;
use crate::error::MediaResult;
use crate::filters::{build_finalize_filter, CaptionStyle, WatermarkPlacement};
use crate::renderer::MediaRenderer;

/// Settings for turning a raw clip into a final clip.
#[derive(Debug, Clone, Default)]
pub struct FinalizeOptions {
    pub caption: CaptionStyle,
    pub watermark: WatermarkPlacement,
    pub encoding: EncodingConfig,
    /// Source-video time at which the raw clip starts (seconds)
    pub caption_offset: f64,
}

impl FinalizeOptions {
    /// Set the caption offset.
    pub fn with_caption_offset(mut self, offset: f64) -> Self {
        self.caption_offset = offset;
        self
    }
}

/// Build the post-processing render for a raw clip.
///
/// Missing subtitle or watermark files are not errors; the matching filter
/// is left out of the graph.
pub fn build_finalize_command(
    raw_clip: &Path,
    subtitle: &Path,
    watermark: &Path,
    output: &Path,
    options: &FinalizeOptions,
) -> FfmpegCommand {
    let subtitle = subtitle.is_file().then_some(subtitle);
    let watermark = watermark.is_file().then_some(watermark);

    if subtitle.is_none() {
        debug!(path = %output.display(), "No subtitle file, skipping captions");
    }
    if watermark.is_none() {
        debug!(path = %output.display(), "No watermark image, skipping overlay");
    }

    let mut cmd = FfmpegCommand::new(raw_clip, output);

    if let Some(filter) = build_finalize_filter(
        subtitle,
        watermark,
        options.caption,
        options.watermark,
        options.caption_offset,
    ) {
        cmd = cmd.video_filter(filter);
    }

    cmd.encoding(&options.encoding)
}

/// Burn captions and overlay the watermark onto a raw clip.
pub async fn finalize_clip(
    renderer: &dyn MediaRenderer,
    raw_clip: &Path,
    subtitle: &Path,
    watermark: &Path,
    output: &Path,
    options: &FinalizeOptions,
) -> MediaResult<()> {
    info!(
        "Finalizing clip: {} -> {}",
        raw_clip.display(),
        output.display()
    );

    let cmd = build_finalize_command(raw_clip, subtitle, watermark, output, options);
    renderer.render(&cmd).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::testing::RecordingRenderer;

    fn write_file(dir: &Path, name: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"x").unwrap();
        path
    }

    #[test]
    fn test_both_resources_present() {
        let dir = tempfile::tempdir().unwrap();
        let srt = write_file(dir.path(), "job.srt");
        let logo = write_file(dir.path(), "logo.png");

        let cmd = build_finalize_command(
            Path::new("raw_clip1.mp4"),
            &srt,
            &logo,
            Path::new("clip1.mp4"),
            &FinalizeOptions::default(),
        );

        let filter = cmd.output_value("-vf").unwrap();
        assert!(filter.find("subtitles=").unwrap() < filter.find("overlay=").unwrap());
        assert!(filter.contains("FontSize=24"));
        assert!(filter.contains("overlay=W-w-10:H-h-10"));
    }

    #[test]
    fn test_missing_resources_reencode_only() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = build_finalize_command(
            Path::new("raw_clip1.mp4"),
            &dir.path().join("missing.srt"),
            &dir.path().join("missing.png"),
            Path::new("clip1.mp4"),
            &FinalizeOptions::default(),
        );

        assert!(cmd.output_value("-vf").is_none());
        assert_eq!(cmd.output_value("-c:v"), Some("libx264"));
        assert_eq!(cmd.output_value("-c:a"), Some("aac"));
    }

    #[test]
    fn test_subtitle_only_uses_offset() {
        let dir = tempfile::tempdir().unwrap();
        let srt = write_file(dir.path(), "job.srt");

        let options = FinalizeOptions::default().with_caption_offset(30.0);
        let cmd = build_finalize_command(
            Path::new("raw_clip1.mp4"),
            &srt,
            &dir.path().join("missing.png"),
            Path::new("clip1.mp4"),
            &options,
        );

        let filter = cmd.output_value("-vf").unwrap();
        assert!(filter.starts_with("setpts=PTS+30.000/TB,subtitles="));
        assert!(!filter.contains("overlay"));
    }

    #[tokio::test]
    async fn test_finalize_clip_renders_once() {
        let dir = tempfile::tempdir().unwrap();
        let raw = write_file(dir.path(), "raw_clip1.mp4");
        let output = dir.path().join("clip1.mp4");
        let renderer = RecordingRenderer::new();

        finalize_clip(
            &renderer,
            &raw,
            &dir.path().join("none.srt"),
            &dir.path().join("none.png"),
            &output,
            &FinalizeOptions::default(),
        )
        .await
        .unwrap();

        let commands = renderer.commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].output(), output.as_path());
        assert!(output.exists());
    }
}
