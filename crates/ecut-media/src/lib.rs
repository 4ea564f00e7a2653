#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper for the clip-assembly pipeline.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building and execution
//! - The `MediaRenderer` seam between the pipeline and FFmpeg
//! - Raw clip extraction and caption/watermark post-processing
//! - SRT subtitle writing
//! - Whisper CLI transcription

pub mod clip;
pub mod command;
pub mod encoding;
pub mod error;
pub mod filters;
pub mod finalize;
pub mod probe;
pub mod renderer;
pub mod subtitles;
pub mod transcribe;

pub use clip::{extract_clip_command, extract_clips};
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use encoding::EncodingConfig;
pub use error::{MediaError, MediaResult};
pub use filters::{CaptionStyle, WatermarkPlacement};
pub use finalize::{build_finalize_command, finalize_clip, FinalizeOptions};
pub use probe::get_duration;
pub use renderer::{FfmpegRenderer, MediaRenderer};
pub use subtitles::{render_srt, write_srt};
pub use transcribe::{Transcriber, WhisperCliTranscriber};
