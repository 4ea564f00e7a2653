//! Clip scoring.
//!
//! Shorter clips score higher: a clip of length zero earns the full 50 point
//! base, one of a minute or more earns none. A random bonus in
//! `[BONUS_MIN, BONUS_MAX)` is added and the total is capped at 100.

use std::path::Path;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ecut_media::{MediaRenderer, MediaResult};

/// Smallest bonus (inclusive).
pub const BONUS_MIN: u8 = 20;

/// Largest bonus (exclusive).
pub const BONUS_MAX: u8 = 50;

/// Clip length at or beyond which the base score is zero (seconds).
const BASE_WINDOW_SECS: f64 = 60.0;

/// Weight of the length-based part of the score.
const BASE_WEIGHT: f64 = 50.0;

/// Source of the random score bonus.
pub trait RandomSource: Send + Sync {
    /// Draw a bonus uniformly from `[BONUS_MIN, BONUS_MAX)`.
    fn bonus(&self) -> u8;
}

/// Thread-local generator for production use.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn bonus(&self) -> u8 {
        rand::rng().random_range(BONUS_MIN..BONUS_MAX)
    }
}

/// Deterministic generator for tests.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn bonus(&self) -> u8 {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.random_range(BONUS_MIN..BONUS_MAX)
    }
}

/// Score a clip of `duration` seconds given a drawn `bonus`.
pub fn compute_score(duration: f64, bonus: u8) -> u8 {
    let duration = if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        0.0
    };

    let base = (BASE_WINDOW_SECS - duration).max(0.0) / BASE_WINDOW_SECS * BASE_WEIGHT;
    (base + f64::from(bonus)).trunc().min(100.0) as u8
}

/// Score a rendered clip, reading its length from the renderer.
pub async fn score_clip(
    renderer: &dyn MediaRenderer,
    rng: &dyn RandomSource,
    clip: &Path,
) -> MediaResult<u8> {
    let duration = renderer.duration(clip).await?;
    Ok(compute_score(duration, rng.bonus()))
}
