//! Game state and core simulation types
//!
//! `SimulationContext` is the single owner of all mutable gameplay state. The
//! frame driver owns one context and passes it into `tick()`; nothing here is
//! global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyState;
use super::pool::EntityPool;
use super::spawner::SpawnClock;
use crate::tuning::{PlayerTuning, Tuning};

/// 24-bit RGB colour (`0xRRGGBB`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    /// CSS hex form, e.g. `#4cc9f0`
    pub fn to_css(self) -> String {
        format!("#{:06x}", self.0 & 0xff_ffff)
    }
}

/// Falling object kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Asteroid - ends the run on contact
    #[default]
    Hazard,
    Planet,
    Earth,
    Moon,
    Star,
    Galaxy,
}

impl ObjectKind {
    pub fn is_hazard(self) -> bool {
        self == ObjectKind::Hazard
    }
}

/// A falling object occupying an entity pool slot
#[derive(Debug, Clone, Default)]
pub struct FallingObject {
    pub pos: Vec2,
    /// Pixels per nominal frame
    pub fall_speed: f32,
    pub kind: ObjectKind,
    pub radius: f32,
    pub score: u64,
    pub color: Color,
    pub angle: f32,
    /// Radians per nominal frame
    pub rotation_speed: f32,
}

/// A visual particle (not gameplay-affecting)
#[derive(Debug, Clone, Default)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub life: f32, // 0-1, decreases over time
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    /// `x` is smoothed toward the input target; `y` is bottom-anchored
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Animation only, wraps at TAU
    pub thruster_phase: f32,
}

impl Player {
    pub fn new(tuning: &PlayerTuning, viewport: Viewport) -> Self {
        Self {
            pos: Vec2::new(viewport.width / 2.0, viewport.height - tuning.y_offset),
            width: tuning.width,
            height: tuning.height,
            thruster_phase: 0.0,
        }
    }

    /// Valid range for the ship's centre given the viewport width
    pub fn x_bounds(&self, viewport: Viewport) -> (f32, f32) {
        let lo = self.width / 2.0;
        let hi = viewport.width - self.width / 2.0;
        if hi < lo {
            // Viewport narrower than the ship: pin to centre
            let mid = viewport.width / 2.0;
            (mid, mid)
        } else {
            (lo, hi)
        }
    }
}

/// Visible play area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        let sane = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: sane(width),
            height: sane(height),
        }
    }
}

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Attract mode, only decoration animates
    Idle,
    /// Simulation running
    Playing,
    /// Frozen by an external suspend signal (tab hidden)
    Paused,
    /// Frozen after a hazard collision
    GameOver,
}

/// Semantic events emitted by the simulation for the outer collaborators
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Started,
    Collected { kind: ObjectKind, score: u64 },
    Escalated(DifficultyState),
    Crashed { score: u64 },
    NewHighScore(u64),
    Suspended,
    Resumed,
    ReturnedHome,
}

/// Everything that changes while the game runs
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u64,
    /// Best completed run, loaded from persistence by the driver
    pub high_score: u64,
    pub difficulty: DifficultyState,
    pub pool: EntityPool,
    pub player: Player,
    /// Horizontal target the ship is steering toward
    pub input_target_x: f32,
    pub viewport: Viewport,
    /// Gameplay clock in nominal frames (reset on start)
    pub elapsed: f32,
    /// Free-running presentation clock in nominal frames (never reset)
    pub presentation_time: f32,
    pub spawn_clock: SpawnClock,
    pub rng: Pcg32,
    /// Pending events, drained by the driver after each tick
    pub events: Vec<GameEvent>,
}

impl SimulationContext {
    pub fn new(tuning: Tuning, viewport: Viewport, seed: u64) -> Self {
        let player = Player::new(&tuning.player, viewport);
        Self {
            phase: GamePhase::Idle,
            score: 0,
            high_score: 0,
            difficulty: DifficultyState::initial(&tuning.difficulty),
            pool: EntityPool::new(tuning.pool.entity_capacity, tuning.pool.particle_capacity),
            input_target_x: player.pos.x,
            player,
            viewport,
            elapsed: 0.0,
            presentation_time: 0.0,
            spawn_clock: SpawnClock::default(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            tuning,
        }
    }

    /// Resize the play area, re-anchoring the ship to the bottom edge
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.player.pos.y = viewport.height - self.tuning.player.y_offset;
        let (lo, hi) = self.player.x_bounds(viewport);
        self.player.pos.x = self.player.pos.x.clamp(lo, hi);
        self.input_target_x = self.input_target_x.clamp(lo, hi);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Centre the ship and its input target
    pub(crate) fn center_player(&mut self) {
        let mid = self.viewport.width / 2.0;
        self.player.pos.x = mid;
        self.input_target_x = mid;
    }
}
