use serde::Serialize;

use crate::db::operations::AttemptRecord;
use crate::services::presets::DifficultyPreset;

/// Lower bound applied when speeding up. Independent of the tier minimum.
pub const EXPOSURE_FLOOR_MS: i64 = 150;
/// Upper bound applied when slowing down. Independent of the tier maximum.
pub const EXPOSURE_CAP_MS: i64 = 2000;

pub const SPEED_UP_ACCURACY: f64 = 0.8;
pub const SPEED_UP_REACTION_MS: f64 = 900.0;
pub const SLOW_DOWN_ACCURACY: f64 = 0.6;
pub const SPEED_UP_DELTA_MS: i64 = 50;
pub const SLOW_DOWN_DELTA_MS: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Performance {
    pub attempts: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub avg_reaction_ms: f64,
}

impl Performance {
    pub fn from_attempts(attempts: &[AttemptRecord]) -> Self {
        let total = attempts.len();
        let correct = attempts.iter().filter(|a| a.correct).count();
        // summed as i128 so large reaction times cannot overflow
        let reaction_sum: i128 = attempts.iter().map(|a| i128::from(a.reaction_ms)).sum();

        if total == 0 {
            return Self {
                attempts: 0,
                correct: 0,
                accuracy: 0.0,
                avg_reaction_ms: 0.0,
            };
        }

        Self {
            attempts: total,
            correct,
            accuracy: correct as f64 / total as f64,
            avg_reaction_ms: reaction_sum as f64 / total as f64,
        }
    }
}

/// Starting exposure for a new session: the last finished session's stored
/// value when there is one, otherwise the tier default, clamped to the tier.
pub fn seed_exposure(preset: &DifficultyPreset, last_finished: Option<i64>) -> i64 {
    preset.clamp_exposure(last_finished.unwrap_or(preset.exposure_ms))
}

pub fn next_exposure(current_ms: i64, performance: &Performance) -> i64 {
    if performance.accuracy > SPEED_UP_ACCURACY && performance.avg_reaction_ms < SPEED_UP_REACTION_MS {
        (current_ms - SPEED_UP_DELTA_MS).max(EXPOSURE_FLOOR_MS)
    } else if performance.accuracy < SLOW_DOWN_ACCURACY {
        (current_ms + SLOW_DOWN_DELTA_MS).min(EXPOSURE_CAP_MS)
    } else {
        current_ms
    }
}
