//! Best-score persistence
//!
//! A single integer under one key. Missing or unparseable values read as 0.

use crate::persistence::KeyValueStore;

/// Storage key for the best score
pub const STORAGE_KEY: &str = "cosmic_catcher_highscore";

/// Integer read/write over a key-value store
pub trait HighScoreStore {
    fn get(&self, key: &str) -> Option<u64>;
    fn set(&mut self, key: &str, value: u64);
}

impl<S: KeyValueStore + ?Sized> HighScoreStore for S {
    fn get(&self, key: &str) -> Option<u64> {
        let raw = self.get_item(key)?;
        match raw.trim().parse::<u64>() {
            Ok(v) => Some(v),
            Err(_) => {
                log::warn!("Ignoring malformed value for {}: {:?}", key, raw);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: u64) {
        self.set_item(key, &value.to_string());
    }
}

/// Monotonic best-score tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScores {
    best: u64,
}

impl HighScores {
    /// Load the stored best, 0 when absent
    pub fn load(store: &impl HighScoreStore) -> Self {
        let best = store.get(STORAGE_KEY).unwrap_or(0);
        log::info!("Loaded high score {}", best);
        Self { best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Persist `score` if it beats the stored best; returns whether it did
    pub fn record(&mut self, score: u64, store: &mut impl HighScoreStore) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        store.set(STORAGE_KEY, score);
        log::info!("High score saved ({})", score);
        true
    }
}
