//! Score-gated difficulty escalation
//!
//! Difficulty only moves when a collection lands the score exactly on a
//! multiple of the gate, giving a stepped curve instead of a creeping one.
//! Each parameter saturates independently at its bound.

use serde::{Deserialize, Serialize};

use crate::tuning::DifficultyTuning;

/// Current spawn pressure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyState {
    /// Base fall speed in pixels per nominal frame
    pub fall_speed: f32,
    /// Mean nominal frames between spawns
    pub spawn_interval: f32,
    /// Chance that a spawn is a hazard
    pub hazard_probability: f32,
}

impl DifficultyState {
    /// Starting triple for a fresh run
    pub fn initial(tuning: &DifficultyTuning) -> Self {
        Self {
            fall_speed: tuning.initial_fall_speed,
            spawn_interval: tuning.initial_spawn_interval,
            hazard_probability: tuning.hazard_probability_base,
        }
    }

    /// Escalate if `new_score` sits on the gate; otherwise unchanged
    pub fn on_score(self, new_score: u64, tuning: &DifficultyTuning) -> Self {
        if tuning.escalation_gate == 0 || new_score % tuning.escalation_gate != 0 {
            return self;
        }
        self.escalate(tuning)
    }

    /// One saturating step harder
    pub fn escalate(self, tuning: &DifficultyTuning) -> Self {
        Self {
            fall_speed: (self.fall_speed + tuning.fall_speed_increment).min(tuning.fall_speed_cap),
            spawn_interval: (self.spawn_interval - tuning.spawn_interval_step)
                .max(tuning.spawn_interval_floor),
            hazard_probability: (self.hazard_probability + tuning.hazard_probability_step)
                .min(tuning.hazard_probability_max),
        }
    }

    /// True once every parameter sits on its bound
    pub fn is_saturated(&self, tuning: &DifficultyTuning) -> bool {
        self.fall_speed >= tuning.fall_speed_cap
            && self.spawn_interval <= tuning.spawn_interval_floor
            && self.hazard_probability >= tuning.hazard_probability_max
    }
}
