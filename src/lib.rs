//! Cosmic Catcher - steer a ship along the bottom edge, catch falling
//! planets and stars, dodge asteroids
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pool, spawning, difficulty, collisions, state machine)
//! - `game`: Frame driver wiring the simulation to its collaborators
//! - `renderer`: Draw-order contract and the Canvas 2D backend
//! - `audio` / `haptics`: Feedback collaborators
//! - `persistence` / `highscores` / `settings`: Key-value storage and what lives in it
//! - `interstitial`: Ad cadence between runs
//! - `autopilot`: Demo-mode steering
//! - `platform`: Browser wiring
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod autopilot;
pub mod game;
pub mod haptics;
pub mod highscores;
pub mod interstitial;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use highscores::HighScores;
pub use persistence::{JsonFileStore, KeyValueStore, MemoryStore, PersistenceError};
pub use settings::Settings;
pub use tuning::Tuning;
