//! FFmpeg filter graphs for post-processing.
//!
//! Captions are always burned before the watermark is overlaid, so the
//! watermark sits on top of caption text.

use std::path::Path;

/// Default caption font size.
pub const DEFAULT_CAPTION_FONT_SIZE: u32 = 24;

/// Default watermark distance from the right and bottom edges (pixels).
pub const DEFAULT_WATERMARK_MARGIN: u32 = 10;

/// Caption burn-in style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionStyle {
    pub font_size: u32,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_CAPTION_FONT_SIZE,
        }
    }
}

/// Watermark anchoring in the bottom-right corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatermarkPlacement {
    /// Horizontal offset from right edge (pixels)
    pub margin_x: u32,
    /// Vertical offset from bottom edge (pixels)
    pub margin_y: u32,
}

impl Default for WatermarkPlacement {
    fn default() -> Self {
        Self {
            margin_x: DEFAULT_WATERMARK_MARGIN,
            margin_y: DEFAULT_WATERMARK_MARGIN,
        }
    }
}

impl WatermarkPlacement {
    /// Same margin on both axes.
    pub fn uniform(margin: u32) -> Self {
        Self {
            margin_x: margin,
            margin_y: margin,
        }
    }
}

/// Escape a path for use inside a quoted filter argument.
pub fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace(':', "\\:")
}

/// Caption-burn filter for an SRT file.
///
/// A positive `offset` maps clip time onto source time for the duration of
/// the subtitles filter, so a transcript timed against the full video lines
/// up with a clip cut from `offset` seconds in.
pub fn caption_filter(srt_path: &Path, style: CaptionStyle, offset: f64) -> String {
    let subtitles = format!(
        "subtitles='{}':force_style='FontSize={}'",
        escape_filter_path(srt_path),
        style.font_size
    );

    if offset > 0.0 {
        format!(
            "setpts=PTS+{:.3}/TB,{},setpts=PTS-STARTPTS",
            offset, subtitles
        )
    } else {
        subtitles
    }
}

/// Overlay chain loading the watermark with the `movie` source filter.
fn overlay_chain(image_path: &Path, placement: WatermarkPlacement, input_label: &str) -> String {
    format!(
        "movie='{}'[wm];[{}][wm]overlay=W-w-{}:H-h-{}",
        escape_filter_path(image_path),
        input_label,
        placement.margin_x,
        placement.margin_y
    )
}

/// Build the single-input filter graph for a final clip.
///
/// Returns `None` when neither captions nor a watermark apply.
pub fn build_finalize_filter(
    subtitle: Option<&Path>,
    watermark: Option<&Path>,
    caption: CaptionStyle,
    placement: WatermarkPlacement,
    caption_offset: f64,
) -> Option<String> {
    match (subtitle, watermark) {
        (None, None) => None,
        (Some(srt), None) => Some(caption_filter(srt, caption, caption_offset)),
        (None, Some(logo)) => Some(overlay_chain(logo, placement, "in")),
        (Some(srt), Some(logo)) => {
            let chains = [
                format!("[in]{}[cap]", caption_filter(srt, caption, caption_offset)),
                overlay_chain(logo, placement, "cap"),
            ];
            Some(chains.join(";"))
        }
    }
}
