//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - Time enters only as `dt` in nominal frames
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)

pub mod collision;
pub mod difficulty;
pub mod lifecycle;
pub mod pool;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{overlaps, resolve_collisions};
pub use difficulty::DifficultyState;
pub use pool::{EntityPool, Pool, SlotAction, SlotId};
pub use spawner::{SpawnClock, spawn};
pub use state::{
    Color, FallingObject, GameEvent, GamePhase, ObjectKind, Particle, Player, SimulationContext,
    Viewport,
};
pub use tick::{TickInput, sanitize_dt, smoothing_factor, tick};
