//! Data-driven game balance
//!
//! Every number the simulation depends on lives here so a build can be re-balanced
//! from a JSON document without touching gameplay code. Missing fields fall back to
//! the shipped defaults.

use serde::{Deserialize, Serialize};

use crate::persistence::PersistenceError;
use crate::sim::state::{Color, ObjectKind};

/// Complete balance sheet for one game build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub difficulty: DifficultyTuning,
    pub spawn: SpawnTuning,
    pub hazard: KindProfile,
    /// Non-hazard kinds, drawn uniformly on every safe spawn
    pub safe_kinds: Vec<KindProfile>,
    pub particles: ParticleTuning,
    pub pool: PoolTuning,
    pub timing: TimingTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player: PlayerTuning::default(),
            difficulty: DifficultyTuning::default(),
            spawn: SpawnTuning::default(),
            hazard: KindProfile::default(),
            safe_kinds: default_safe_kinds(),
            particles: ParticleTuning::default(),
            pool: PoolTuning::default(),
            timing: TimingTuning::default(),
        }
    }
}

impl Tuning {
    /// Overlay a JSON document on the defaults
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        // An explicit empty table would leave safe spawns with nothing to draw from
        if tuning.safe_kinds.is_empty() {
            tuning.safe_kinds = default_safe_kinds();
        }
        Ok(tuning)
    }

    /// Look up the profile for a kind (hazard included)
    pub fn profile(&self, kind: ObjectKind) -> Option<&KindProfile> {
        if kind == ObjectKind::Hazard {
            return Some(&self.hazard);
        }
        self.safe_kinds.iter().find(|p| p.kind == kind)
    }
}

/// Player ship geometry and handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    /// Distance of the ship's anchor from the bottom edge
    pub y_offset: f32,
    /// Fraction of the remaining distance covered per nominal frame
    pub base_lerp: f32,
    /// Pixels per nominal frame while a direction key is held
    pub keyboard_speed: f32,
    /// Thruster animation advance per nominal frame
    pub thruster_rate: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 60.0,
            height: 60.0,
            y_offset: 100.0,
            base_lerp: 0.15,
            keyboard_speed: 15.0,
            thruster_rate: 0.5,
        }
    }
}

/// Score-gated escalation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTuning {
    pub initial_fall_speed: f32,
    pub fall_speed_cap: f32,
    pub fall_speed_increment: f32,
    /// Mean nominal frames between spawns
    pub initial_spawn_interval: f32,
    pub spawn_interval_floor: f32,
    pub spawn_interval_step: f32,
    pub hazard_probability_base: f32,
    pub hazard_probability_max: f32,
    pub hazard_probability_step: f32,
    /// Escalation fires only when the new score is a multiple of this
    pub escalation_gate: u64,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self {
            initial_fall_speed: 4.0,
            fall_speed_cap: 15.0,
            fall_speed_increment: 0.3,
            initial_spawn_interval: 50.0,
            spawn_interval_floor: 15.0,
            spawn_interval_step: 2.0,
            hazard_probability_base: 0.1,
            hazard_probability_max: 0.5,
            hazard_probability_step: 0.02,
            escalation_gate: 5,
        }
    }
}

/// How the spawn clock decides when to emit an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpawnPolicy {
    /// Memoryless: each tick spawns with probability `dt / spawn_interval`
    #[default]
    Probabilistic,
    /// Exactly one spawn per elapsed `spawn_interval` of simulated time
    Interval,
}

/// Spawn placement and motion jitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub policy: SpawnPolicy,
    /// Horizontal keep-out at both edges
    pub edge_margin: f32,
    /// Vertical spawn position (negative = above the top edge)
    pub spawn_y: f32,
    pub speed_jitter_min: f32,
    pub speed_jitter_max: f32,
    /// Rotation speed is uniform over `[-range, range]`
    pub rotation_speed_range: f32,
    pub star_rotation_multiplier: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            policy: SpawnPolicy::Probabilistic,
            edge_margin: 20.0,
            spawn_y: -50.0,
            speed_jitter_min: 0.8,
            speed_jitter_max: 1.2,
            rotation_speed_range: 0.05,
            star_rotation_multiplier: 2.0,
        }
    }
}

/// Appearance and value of one falling kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindProfile {
    pub kind: ObjectKind,
    pub color: Color,
    pub score: u64,
    pub radius: f32,
}

impl Default for KindProfile {
    fn default() -> Self {
        Self {
            kind: ObjectKind::Hazard,
            color: Color(0x5c5c5c),
            score: 0,
            radius: 25.0,
        }
    }
}

fn default_safe_kinds() -> Vec<KindProfile> {
    vec![
        KindProfile { kind: ObjectKind::Planet, color: Color(0x4cc9f0), score: 1, radius: 16.0 },
        KindProfile { kind: ObjectKind::Earth, color: Color(0x1e88e5), score: 5, radius: 18.0 },
        KindProfile { kind: ObjectKind::Moon, color: Color(0xe0e1dd), score: 1, radius: 10.0 },
        KindProfile { kind: ObjectKind::Star, color: Color(0xffd166), score: 2, radius: 9.0 },
        KindProfile { kind: ObjectKind::Galaxy, color: Color(0x7209b7), score: 3, radius: 14.0 },
    ]
}

/// Collection burst parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    pub burst_count: usize,
    /// Each velocity component is uniform over `[-max_speed, max_speed]`
    pub max_speed: f32,
    /// Life lost per nominal frame (life starts at 1.0)
    pub decay_rate: f32,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            burst_count: 8,
            max_speed: 4.0,
            decay_rate: 0.05,
        }
    }
}

/// Pre-allocated pool sizes (growth past these is allowed)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolTuning {
    pub entity_capacity: usize,
    pub particle_capacity: usize,
}

impl Default for PoolTuning {
    fn default() -> Self {
        Self {
            entity_capacity: 50,
            particle_capacity: 100,
        }
    }
}

/// Frame timing normalisation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingTuning {
    /// Milliseconds in one nominal frame (`dt = 1.0`)
    pub reference_frame_ms: f64,
    /// Upper clamp for a single tick's `dt`
    pub max_dt: f32,
}

impl Default for TimingTuning {
    fn default() -> Self {
        Self {
            reference_frame_ms: 16.67,
            max_dt: 4.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_five_safe_kinds() {
        let tuning = Tuning::default();
        assert_eq!(tuning.safe_kinds.len(), 5);
        assert!(tuning.safe_kinds.iter().all(|p| p.kind != ObjectKind::Hazard));
        assert_eq!(tuning.profile(ObjectKind::Earth).map(|p| p.score), Some(5));
        assert_eq!(tuning.profile(ObjectKind::Hazard).map(|p| p.score), Some(0));
    }

    #[test]
    fn test_from_json_overlays_defaults() {
        let tuning = Tuning::from_json(r#"{ "difficulty": { "fall_speed_cap": 20.0 } }"#)
            .expect("valid json");
        assert_eq!(tuning.difficulty.fall_speed_cap, 20.0);
        assert_eq!(tuning.difficulty.initial_fall_speed, 4.0);
        assert_eq!(tuning.player.width, 60.0);
        assert_eq!(tuning.safe_kinds.len(), 5);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Tuning::from_json("not json").is_err());
    }
}
