//! Per-job clip pipeline.
//!
//! Stages run strictly in order and the first error aborts the job:
//! transcribe, detect highlights (falling back to the opening 15 seconds),
//! write the full-transcript caption file, cut raw clips, then finalize and
//! score each clip. Files written before a failure are left on disk.

use std::path::Path;
use std::sync::Arc;

use tracing::Instrument;

use ecut_media::{
    extract_clips, finalize_clip, write_srt, EncodingConfig, FfmpegRenderer, MediaRenderer,
    Transcriber, WhisperCliTranscriber,
};
use ecut_models::{clip_file_name, FinalClip, Highlight, JobId};

use crate::config::WorkerConfig;
use crate::detect::detect_highlights;
use crate::error::WorkerResult;
use crate::logging::JobLogger;
use crate::metrics::record_clip_rendered;
use crate::score::{score_clip, RandomSource, ThreadRandom};

/// Shared services for running jobs.
#[derive(Clone)]
pub struct ProcessingContext {
    pub config: Arc<WorkerConfig>,
    pub renderer: Arc<dyn MediaRenderer>,
    pub transcriber: Arc<dyn Transcriber>,
    pub rng: Arc<dyn RandomSource>,
}

impl ProcessingContext {
    pub fn new(
        config: WorkerConfig,
        renderer: Arc<dyn MediaRenderer>,
        transcriber: Arc<dyn Transcriber>,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            renderer,
            transcriber,
            rng,
        }
    }

    /// Production services: FFmpeg rendering, whisper transcription and
    /// thread-local randomness.
    pub fn from_config(config: WorkerConfig) -> Self {
        let renderer = match config.ffmpeg_timeout_secs {
            Some(secs) => FfmpegRenderer::with_timeout(secs),
            None => FfmpegRenderer::new(),
        };
        let transcriber = WhisperCliTranscriber::new(&config.whisper_bin, &config.whisper_model);

        Self::new(
            config,
            Arc::new(renderer),
            Arc::new(transcriber),
            Arc::new(ThreadRandom),
        )
    }
}

/// Turn an uploaded video into scored, captioned, watermarked clips.
///
/// # Returns
/// One [`FinalClip`] per highlight, in highlight order.
pub async fn process_video(
    ctx: &ProcessingContext,
    job_id: &JobId,
    video: &Path,
) -> WorkerResult<Vec<FinalClip>> {
    let logger = JobLogger::new(job_id, "process_video");
    let outcome = run_stages(ctx, job_id, video, &logger)
        .instrument(logger.span())
        .await;
    if let Err(e) = &outcome {
        logger.log_error(&e.to_string());
    }
    outcome
}

async fn run_stages(
    ctx: &ProcessingContext,
    job_id: &JobId,
    video: &Path,
    logger: &JobLogger,
) -> WorkerResult<Vec<FinalClip>> {
    let config = &ctx.config;
    logger.log_start(&format!("{}", video.display()));

    logger.log_stage("transcribe", "Transcribing audio");
    let transcript = ctx.transcriber.transcribe(video).await?;

    let mut highlights = detect_highlights(&transcript);
    if highlights.is_empty() {
        logger.log_warning("No highlights found, using opening range");
        highlights.push(Highlight::fallback());
    } else {
        logger.log_stage("detect", &format!("Found {} highlights", highlights.len()));
    }

    let subtitle = config.subtitle_path(job_id);
    write_srt(&transcript, &subtitle).await?;

    let clips_dir = config.job_clips_dir(job_id);
    tokio::fs::create_dir_all(&clips_dir).await?;

    logger.log_stage("extract", "Cutting raw clips");
    let raw_clips = extract_clips(
        ctx.renderer.as_ref(),
        video,
        &highlights,
        &clips_dir,
        &EncodingConfig::default(),
    )
    .await?;

    let mut clips = Vec::with_capacity(raw_clips.len());
    for (idx, (raw_clip, highlight)) in raw_clips.iter().zip(&highlights).enumerate() {
        let index = idx + 1;
        let output = clips_dir.join(clip_file_name(index));

        finalize_clip(
            ctx.renderer.as_ref(),
            raw_clip,
            &subtitle,
            &config.brand_logo_path,
            &output,
            &config.finalize_options(highlight.start),
        )
        .await?;

        let score = score_clip(ctx.renderer.as_ref(), ctx.rng.as_ref(), &output).await?;
        record_clip_rendered();
        clips.push(FinalClip::new(job_id, index, highlight.text.clone(), score));
    }

    logger.log_completion(&format!("{} clips", clips.len()));
    Ok(clips)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ecut_media::renderer::testing::RecordingRenderer;
    use ecut_media::{MediaError, MediaResult};
    use ecut_models::Segment;

    use crate::error::WorkerError;
    use crate::score::SeededRandom;

    struct FixedTranscriber(Vec<Segment>);

    #[async_trait]
    impl Transcriber for FixedTranscriber {
        async fn transcribe(&self, _video: &Path) -> MediaResult<Vec<Segment>> {
            Ok(self.0.clone())
        }
    }

    struct FailingTranscriber;

    #[async_trait]
    impl Transcriber for FailingTranscriber {
        async fn transcribe(&self, _video: &Path) -> MediaResult<Vec<Segment>> {
            Err(MediaError::transcription_failed("model exploded"))
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        config: WorkerConfig,
        video: std::path::PathBuf,
    }

    async fn fixture(with_logo: bool) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let config = WorkerConfig::with_data_dir(dir.path());
        config.ensure_dirs().await.unwrap();

        let video = config.videos_dir.join("job.mp4");
        std::fs::write(&video, b"video").unwrap();
        if with_logo {
            std::fs::write(&config.brand_logo_path, b"png").unwrap();
        }

        Fixture {
            _dir: dir,
            config,
            video,
        }
    }

    fn context(
        config: &WorkerConfig,
        renderer: Arc<RecordingRenderer>,
        transcriber: impl Transcriber + 'static,
    ) -> ProcessingContext {
        ProcessingContext::new(
            config.clone(),
            renderer,
            Arc::new(transcriber),
            Arc::new(SeededRandom::new(3)),
        )
    }

    fn demo_transcript() -> Vec<Segment> {
        vec![
            Segment::new(0.0, 2.0, "this is amazing"),
            Segment::new(2.3, 4.0, "wow unbelievable"),
            Segment::new(30.0, 32.0, "nothing special"),
        ]
    }

    #[tokio::test]
    async fn test_keyword_transcript_yields_one_clip() {
        let fx = fixture(true).await;
        let renderer = Arc::new(RecordingRenderer::new());
        let ctx = context(&fx.config, renderer.clone(), FixedTranscriber(demo_transcript()));
        let job_id = JobId::from_string("job");

        let clips = process_video(&ctx, &job_id, &fx.video).await.unwrap();

        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].video_url, "/clips/job/clip1.mp4");
        assert_eq!(clips[0].subtitle, "this is amazing wow unbelievable");
        // 4 second clip: base 46, bonus in [20, 50)
        assert!((66..=95).contains(&clips[0].score));

        let commands = renderer.commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].input_value("-ss"), Some("0.000"));
        assert_eq!(commands[0].input_value("-t"), Some("4.000"));

        let filter = commands[1].output_value("-vf").unwrap();
        assert!(filter.contains("subtitles="));
        assert!(filter.contains("overlay=W-w-10:H-h-10"));

        let clip_dir = fx.config.job_clips_dir(&job_id);
        assert!(clip_dir.join("raw_clip1.mp4").exists());
        assert!(clip_dir.join("clip1.mp4").exists());

        let srt = std::fs::read_to_string(fx.config.subtitle_path(&job_id)).unwrap();
        assert_eq!(srt.matches(" --> ").count(), 3);
    }

    #[tokio::test]
    async fn test_no_keywords_falls_back_to_opening() {
        let fx = fixture(false).await;
        let renderer = Arc::new(RecordingRenderer::new());
        let transcript = vec![Segment::new(0.0, 3.0, "just talking")];
        let ctx = context(&fx.config, renderer.clone(), FixedTranscriber(transcript));

        let clips = process_video(&ctx, &JobId::from_string("calm"), &fx.video)
            .await
            .unwrap();

        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].subtitle, "");
        // 15 second clip: base 37, bonus in [20, 50)
        assert!((57..=86).contains(&clips[0].score));

        let commands = renderer.commands();
        assert_eq!(commands[0].input_value("-ss"), Some("0.000"));
        assert_eq!(commands[0].input_value("-t"), Some("15.000"));

        // No logo on disk, so captions only
        let filter = commands[1].output_value("-vf").unwrap();
        assert!(!filter.contains("overlay"));
    }

    #[tokio::test]
    async fn test_empty_transcript_still_produces_clip() {
        let fx = fixture(true).await;
        let renderer = Arc::new(RecordingRenderer::new());
        let ctx = context(&fx.config, renderer, FixedTranscriber(vec![]));

        let clips = process_video(&ctx, &JobId::from_string("silent"), &fx.video)
            .await
            .unwrap();
        assert_eq!(clips.len(), 1);
    }

    #[tokio::test]
    async fn test_multiple_highlights_in_order() {
        let fx = fixture(true).await;
        let renderer = Arc::new(RecordingRenderer::new());
        let transcript = vec![
            Segment::new(40.0, 42.0, "crazy ending"),
            Segment::new(5.0, 7.0, "awesome start"),
        ];
        let ctx = context(&fx.config, renderer.clone(), FixedTranscriber(transcript));

        let clips = process_video(&ctx, &JobId::from_string("two"), &fx.video)
            .await
            .unwrap();

        let subtitles: Vec<&str> = clips.iter().map(|c| c.subtitle.as_str()).collect();
        assert_eq!(subtitles, vec!["awesome start", "crazy ending"]);
        assert_eq!(clips[1].video_url, "/clips/two/clip2.mp4");

        // Extract, extract, finalize, finalize
        let commands = renderer.commands();
        assert_eq!(commands.len(), 4);
        assert!(commands[3]
            .output_value("-vf")
            .unwrap()
            .starts_with("[in]setpts=PTS+40.000/TB"));
    }

    #[tokio::test]
    async fn test_render_failure_aborts_job() {
        let fx = fixture(true).await;
        let renderer = Arc::new(RecordingRenderer::new().failing_at(2));
        let ctx = context(&fx.config, renderer.clone(), FixedTranscriber(demo_transcript()));

        let result = process_video(&ctx, &JobId::from_string("bad"), &fx.video).await;

        let err = result.unwrap_err();
        assert!(err.is_rendering_failure());
        assert!(matches!(err, WorkerError::Media(MediaError::FfmpegFailed { .. })));
        assert_eq!(renderer.commands().len(), 2);
    }

    #[tokio::test]
    async fn test_transcription_failure_aborts_before_rendering() {
        let fx = fixture(true).await;
        let renderer = Arc::new(RecordingRenderer::new());
        let ctx = context(&fx.config, renderer.clone(), FailingTranscriber);

        let err = process_video(&ctx, &JobId::from_string("deaf"), &fx.video)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("model exploded"));
        assert!(renderer.commands().is_empty());
        assert!(!fx.config.subtitle_path(&JobId::from_string("deaf")).exists());
    }
}
