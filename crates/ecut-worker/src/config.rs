//! Worker configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ecut_media::{CaptionStyle, FinalizeOptions, WatermarkPlacement};
use ecut_models::JobId;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Root for all data directories
    pub data_dir: PathBuf,
    /// Uploaded source videos
    pub videos_dir: PathBuf,
    /// Per-job clip directories
    pub clips_dir: PathBuf,
    /// Job records and caption files
    pub jobs_dir: PathBuf,
    /// Static assets
    pub assets_dir: PathBuf,
    /// Watermark image overlaid on every clip
    pub brand_logo_path: PathBuf,
    /// Whisper model name
    pub whisper_model: String,
    /// Whisper binary name or path
    pub whisper_bin: String,
    /// Maximum concurrent jobs
    pub max_concurrent_jobs: usize,
    /// Caption font size
    pub caption_font_size: u32,
    /// Watermark margin from the bottom-right corner (pixels)
    pub watermark_margin: u32,
    /// Per-command FFmpeg timeout, unlimited when unset
    pub ffmpeg_timeout_secs: Option<u64>,
    /// Graceful shutdown timeout
    pub shutdown_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self::with_data_dir(".")
    }
}

impl WorkerConfig {
    /// Default layout rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let assets_dir = data_dir.join("assets");
        Self {
            videos_dir: data_dir.join("videos"),
            clips_dir: data_dir.join("clips"),
            jobs_dir: data_dir.join("jobs"),
            brand_logo_path: assets_dir.join("logo.png"),
            assets_dir,
            data_dir,
            whisper_model: ecut_media::transcribe::DEFAULT_WHISPER_MODEL.to_string(),
            whisper_bin: "whisper".to_string(),
            max_concurrent_jobs: 2,
            caption_font_size: ecut_media::filters::DEFAULT_CAPTION_FONT_SIZE,
            watermark_margin: ecut_media::filters::DEFAULT_WATERMARK_MARGIN,
            ffmpeg_timeout_secs: None,
            shutdown_timeout: Duration::from_secs(30),
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults =
            Self::with_data_dir(std::env::var("DATA_DIR").unwrap_or_else(|_| ".".to_string()));

        let assets_dir = env_path("ASSETS_DIR").unwrap_or(defaults.assets_dir);
        let brand_logo_path = resolve_logo_path(
            env_path("BRAND_LOGO_PATH"),
            env_path("BRAND_LOGO_URL"),
            &assets_dir,
        );

        Self {
            videos_dir: env_path("VIDEOS_DIR").unwrap_or(defaults.videos_dir),
            clips_dir: env_path("CLIPS_DIR").unwrap_or(defaults.clips_dir),
            jobs_dir: env_path("JOBS_DIR").unwrap_or(defaults.jobs_dir),
            brand_logo_path,
            assets_dir,
            data_dir: defaults.data_dir,
            whisper_model: std::env::var("WHISPER_MODEL").unwrap_or(defaults.whisper_model),
            whisper_bin: std::env::var("WHISPER_BIN").unwrap_or(defaults.whisper_bin),
            max_concurrent_jobs: std::env::var("WORKER_MAX_JOBS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.max_concurrent_jobs),
            caption_font_size: std::env::var("CAPTION_FONT_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.caption_font_size),
            watermark_margin: std::env::var("WATERMARK_MARGIN")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.watermark_margin),
            ffmpeg_timeout_secs: std::env::var("FFMPEG_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok()),
            shutdown_timeout: Duration::from_secs(
                std::env::var("WORKER_SHUTDOWN_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Create the data directories if missing.
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        for dir in [
            &self.videos_dir,
            &self.clips_dir,
            &self.jobs_dir,
            &self.assets_dir,
        ] {
            tokio::fs::create_dir_all(dir).await?;
        }
        Ok(())
    }

    /// Caption file for a job.
    pub fn subtitle_path(&self, job_id: &JobId) -> PathBuf {
        self.jobs_dir.join(format!("{}.srt", job_id))
    }

    /// Directory holding a job's raw and final clips.
    pub fn job_clips_dir(&self, job_id: &JobId) -> PathBuf {
        self.clips_dir.join(job_id.as_str())
    }

    /// Post-processing settings for a clip starting at `caption_offset`.
    pub fn finalize_options(&self, caption_offset: f64) -> FinalizeOptions {
        FinalizeOptions {
            caption: CaptionStyle {
                font_size: self.caption_font_size,
            },
            watermark: WatermarkPlacement::uniform(self.watermark_margin),
            ..Default::default()
        }
        .with_caption_offset(caption_offset)
    }
}

/// `BRAND_LOGO_PATH` wins over the older `BRAND_LOGO_URL`; both default to
/// `{assets_dir}/logo.png`.
fn resolve_logo_path(path: Option<PathBuf>, legacy: Option<PathBuf>, assets_dir: &Path) -> PathBuf {
    path.or(legacy).unwrap_or_else(|| assets_dir.join("logo.png"))
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_data_dir() {
        let config = WorkerConfig::with_data_dir("/data");
        assert_eq!(config.videos_dir, PathBuf::from("/data/videos"));
        assert_eq!(config.brand_logo_path, PathBuf::from("/data/assets/logo.png"));
        assert_eq!(config.max_concurrent_jobs, 2);
        assert!(config.ffmpeg_timeout_secs.is_none());
    }

    #[test]
    fn test_job_paths() {
        let config = WorkerConfig::with_data_dir("/data");
        let job_id = JobId::from_string("abc");
        assert_eq!(config.subtitle_path(&job_id), PathBuf::from("/data/jobs/abc.srt"));
        assert_eq!(config.job_clips_dir(&job_id), PathBuf::from("/data/clips/abc"));
    }

    #[test]
    fn test_finalize_options() {
        let mut config = WorkerConfig::default();
        config.caption_font_size = 32;
        config.watermark_margin = 5;

        let options = config.finalize_options(12.5);
        assert_eq!(options.caption.font_size, 32);
        assert_eq!(options.watermark.margin_x, 5);
        assert_eq!(options.watermark.margin_y, 5);
        assert_eq!(options.caption_offset, 12.5);
    }

    #[test]
    fn test_logo_path_sources() {
        let assets = Path::new("/data/assets");

        assert_eq!(
            resolve_logo_path(None, None, assets),
            PathBuf::from("/data/assets/logo.png")
        );
        assert_eq!(
            resolve_logo_path(None, Some("/srv/brand.png".into()), assets),
            PathBuf::from("/srv/brand.png")
        );
        assert_eq!(
            resolve_logo_path(Some("/srv/new.png".into()), Some("/srv/brand.png".into()), assets),
            PathBuf::from("/srv/new.png")
        );
    }

    #[tokio::test]
    async fn test_ensure_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let config = WorkerConfig::with_data_dir(dir.path());
        config.ensure_dirs().await.unwrap();

        assert!(config.videos_dir.is_dir());
        assert!(config.clips_dir.is_dir());
        assert!(config.jobs_dir.is_dir());
        assert!(config.assets_dir.is_dir());
    }
}
