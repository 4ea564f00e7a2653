//! Highlight detection and clip assembly worker.
//!
//! This crate provides:
//! - Keyword highlight detection over transcripts
//! - Clip scoring with injectable randomness
//! - The per-job pipeline (transcribe, detect, caption, cut, finalize, score)
//! - A bounded job executor fed by the in-process queue

pub mod config;
pub mod detect;
pub mod error;
pub mod executor;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod score;

pub use config::WorkerConfig;
pub use detect::{detect_highlights, HIGHLIGHT_KEYWORDS, MAX_HIGHLIGHTS, MERGE_GAP_SECS};
pub use error::{WorkerError, WorkerResult};
pub use executor::JobExecutor;
pub use logging::JobLogger;
pub use pipeline::{process_video, ProcessingContext};
pub use score::{compute_score, score_clip, RandomSource, SeededRandom, ThreadRandom};
