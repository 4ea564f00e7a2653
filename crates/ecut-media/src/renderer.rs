//! Rendering service abstraction.
//!
//! The pipeline never spawns FFmpeg itself. It builds declarative
//! [`FfmpegCommand`]s and hands them to a [`MediaRenderer`], which lets tests
//! substitute a recording renderer for the real binaries.

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;
use crate::probe::get_duration;

/// External media encoder/decoder.
#[async_trait]
pub trait MediaRenderer: Send + Sync {
    /// Execute a render and wait for it to finish.
    async fn render(&self, cmd: &FfmpegCommand) -> MediaResult<()>;

    /// Query the duration of a media file in seconds.
    async fn duration(&self, path: &Path) -> MediaResult<f64>;
}

/// Renderer backed by the `ffmpeg` and `ffprobe` binaries.
#[derive(Debug, Clone, Default)]
pub struct FfmpegRenderer {
    runner: FfmpegRunner,
}

impl FfmpegRenderer {
    /// Create a new renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer that kills renders running longer than `secs`.
    pub fn with_timeout(secs: u64) -> Self {
        Self {
            runner: FfmpegRunner::new().with_timeout(secs),
        }
    }
}

#[async_trait]
impl MediaRenderer for FfmpegRenderer {
    async fn render(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        self.runner.run(cmd).await?;
        debug!(output = %cmd.output().display(), "Render finished");
        Ok(())
    }

    async fn duration(&self, path: &Path) -> MediaResult<f64> {
        get_duration(path).await
    }
}

/// In-process renderer for tests.
#[cfg(any(test, feature = "test-util"))]
pub mod testing {
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::MediaRenderer;
    use crate::command::FfmpegCommand;
    use crate::error::{MediaError, MediaResult};

    /// Renderer that records every command and writes empty output files.
    ///
    /// Output durations follow the `-t` argument of the render, or the
    /// input's duration when no trim was requested.
    #[derive(Debug, Default)]
    pub struct RecordingRenderer {
        commands: Mutex<Vec<FfmpegCommand>>,
        durations: Mutex<HashMap<PathBuf, f64>>,
        default_duration: f64,
        fail_at: Option<usize>,
    }

    impl RecordingRenderer {
        pub fn new() -> Self {
            Self {
                default_duration: 30.0,
                ..Default::default()
            }
        }

        /// Fail the `n`-th (1-based) render with an FFmpeg error.
        pub fn failing_at(mut self, n: usize) -> Self {
            self.fail_at = Some(n);
            self
        }

        /// Duration reported for files with no recorded render.
        pub fn with_default_duration(mut self, secs: f64) -> Self {
            self.default_duration = secs;
            self
        }

        /// Commands rendered so far, in order.
        pub fn commands(&self) -> Vec<FfmpegCommand> {
            self.commands.lock().map(|c| c.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl MediaRenderer for RecordingRenderer {
        async fn render(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
            let call = {
                let mut commands = self
                    .commands
                    .lock()
                    .map_err(|_| MediaError::InvalidVideo("renderer poisoned".into()))?;
                commands.push(cmd.clone());
                commands.len()
            };

            if self.fail_at == Some(call) {
                return Err(MediaError::ffmpeg_failed(
                    format!("render {} failed", call),
                    None,
                    Some(1),
                ));
            }

            let duration = match cmd.input_value("-t").and_then(|t| t.parse::<f64>().ok()) {
                Some(t) => t,
                None => self.duration(cmd.input()).await.unwrap_or(self.default_duration),
            };

            if let Some(parent) = cmd.output().parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(cmd.output(), b"").await?;

            if let Ok(mut durations) = self.durations.lock() {
                durations.insert(cmd.output().to_path_buf(), duration);
            }
            Ok(())
        }

        async fn duration(&self, path: &Path) -> MediaResult<f64> {
            if !path.exists() {
                return Err(MediaError::FileNotFound(path.to_path_buf()));
            }
            let recorded = self
                .durations
                .lock()
                .ok()
                .and_then(|d| d.get(path).copied());
            Ok(recorded.unwrap_or(self.default_duration))
        }
    }
}
