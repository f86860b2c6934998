//! Score-driven difficulty
//!
//! Below `SPEED_RAMP_SCORE` only the spawn interval shrinks; above it only the
//! fall speed grows. Values change in steps, never continuously.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::*;

/// Current pacing values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Pixels per tick
    pub fall_speed: f32,
    pub spawn_interval_ms: u32,
}

impl Difficulty {
    /// Pacing at score 0
    pub fn initial(config: &GameConfig) -> Self {
        Self {
            fall_speed: config.initial_speed,
            spawn_interval_ms: config.spawn_interval_ms,
        }
    }

    /// Re-derive pacing if `score` sits exactly on a positive difficulty step.
    ///
    /// Only the half of the model that applies to `score` is written; the other
    /// value keeps whatever it last was. Returns true if anything changed.
    pub fn step(&mut self, score: i64, config: &GameConfig) -> bool {
        if score <= 0 || score % DIFFICULTY_STEP != 0 {
            return false;
        }

        let before = *self;
        let target = compute_difficulty(score, config);
        if score < SPEED_RAMP_SCORE {
            self.spawn_interval_ms = target.spawn_interval_ms;
        } else {
            self.fall_speed = target.fall_speed;
        }
        *self != before
    }
}

/// Pure difficulty model: pacing a fresh session would settle on at `score`
pub fn compute_difficulty(score: i64, config: &GameConfig) -> Difficulty {
    let score = score.max(0);
    let steps = score.min(SPEED_RAMP_SCORE) / DIFFICULTY_STEP;
    let reduction = steps.saturating_mul(DIFFICULTY_STEP);
    let spawn_interval_ms = (config.spawn_interval_ms as i64 - reduction)
        .max(config.min_spawn_interval_ms as i64) as u32;

    let fall_speed = if score >= SPEED_RAMP_SCORE {
        let n = (score - SPEED_RAMP_SCORE) / DIFFICULTY_STEP;
        config.initial_speed * (1.0 + n as f32 * SPEED_STEP_FACTOR)
    } else {
        config.initial_speed
    };

    Difficulty {
        fall_speed,
        spawn_interval_ms,
    }
}
