//! Speech transcription.
//!
//! The transcription engine is an external black box. The production
//! implementation extracts 16 kHz mono audio with FFmpeg and runs the
//! `whisper` command-line tool on it, reading back its JSON segments.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info};

use ecut_models::Segment;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Default whisper model.
pub const DEFAULT_WHISPER_MODEL: &str = "tiny";

/// Produces timestamped text segments for a video.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, video: &Path) -> MediaResult<Vec<Segment>>;
}

/// Transcriber backed by the `whisper` CLI.
#[derive(Debug, Clone)]
pub struct WhisperCliTranscriber {
    /// Binary name or path
    binary: String,
    /// Model name passed to `--model`
    model: String,
    runner: FfmpegRunner,
}

impl Default for WhisperCliTranscriber {
    fn default() -> Self {
        Self::new("whisper", DEFAULT_WHISPER_MODEL)
    }
}

impl WhisperCliTranscriber {
    pub fn new(binary: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            model: model.into(),
            runner: FfmpegRunner::new(),
        }
    }

    /// Check that the whisper binary is on PATH.
    pub fn check(&self) -> MediaResult<PathBuf> {
        which::which(&self.binary).map_err(|_| MediaError::TranscriberNotFound(self.binary.clone()))
    }

    async fn extract_audio(&self, video: &Path, wav: &Path) -> MediaResult<()> {
        let cmd = FfmpegCommand::new(video, wav).output_args(["-vn", "-ac", "1", "-ar", "16000"]);
        self.runner.run(&cmd).await
    }
}

#[async_trait]
impl Transcriber for WhisperCliTranscriber {
    async fn transcribe(&self, video: &Path) -> MediaResult<Vec<Segment>> {
        if !video.exists() {
            return Err(MediaError::FileNotFound(video.to_path_buf()));
        }
        self.check()?;

        let temp_dir = tempfile::tempdir()?;
        let wav = temp_dir.path().join("audio.wav");
        self.extract_audio(video, &wav).await?;

        info!(
            video = %video.display(),
            model = %self.model,
            "Transcribing audio with whisper"
        );

        let output = Command::new(&self.binary)
            .arg(&wav)
            .args(["--model", &self.model])
            .args(["--output_format", "json"])
            .arg("--output_dir")
            .arg(temp_dir.path())
            .args(["--fp16", "False", "--verbose", "False"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaError::transcription_failed(format!(
                "{} exited with {:?}: {}",
                self.binary,
                output.status.code(),
                stderr.trim()
            )));
        }

        let json_path = temp_dir.path().join("audio.json");
        let raw = tokio::fs::read(&json_path).await.map_err(|e| {
            MediaError::transcription_failed(format!(
                "whisper produced no transcript at {}: {}",
                json_path.display(),
                e
            ))
        })?;

        let segments = parse_whisper_json(&raw)?;
        debug!(segments = segments.len(), "Transcription finished");
        Ok(segments)
    }
}

#[derive(Debug, Deserialize)]
struct WhisperOutput {
    #[serde(default)]
    segments: Vec<Segment>,
}

/// Parse the segments out of whisper's JSON output.
pub fn parse_whisper_json(raw: &[u8]) -> MediaResult<Vec<Segment>> {
    let parsed: WhisperOutput = serde_json::from_slice(raw)?;
    Ok(parsed.segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whisper_json() {
        let raw = br#"{
            "text": " this is amazing wow",
            "segments": [
                {"id": 0, "seek": 0, "start": 0.0, "end": 2.0, "text": " this is amazing", "avg_logprob": -0.3},
                {"id": 1, "seek": 0, "start": 2.3, "end": 4.0, "text": " wow unbelievable"}
            ],
            "language": "en"
        }"#;

        let segments = parse_whisper_json(raw).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].start, 2.3);
        assert_eq!(segments[0].text, " this is amazing");
    }

    #[test]
    fn test_parse_whisper_json_without_segments() {
        let segments = parse_whisper_json(br#"{"text": ""}"#).unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn test_missing_binary() {
        let t = WhisperCliTranscriber::new("definitely-not-a-whisper-binary", "tiny");
        assert!(matches!(t.check(), Err(MediaError::TranscriberNotFound(_))));
    }
}
