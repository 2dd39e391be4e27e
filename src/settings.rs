//! Player preferences
//!
//! Persisted as JSON under its own key, separate from the best score.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sound effects and ambient music
    pub sound_enabled: bool,
    /// Vibration feedback
    pub haptics_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Ambient loop volume (0.0 - 1.0)
    pub music_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            haptics_enabled: true,
            master_volume: 0.5,
            music_volume: 0.05,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "cosmic_catcher_settings";

    /// Load settings, falling back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        if let Some(json) = store.get_item(Self::STORAGE_KEY) {
            match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings.clamped();
                }
                Err(e) => log::warn!("Discarding unreadable settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                store.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(e) => log::warn!("Failed to encode settings: {}", e),
        }
    }

    fn clamped(mut self) -> Self {
        self.master_volume = unit(self.master_volume);
        self.music_volume = unit(self.music_volume);
        self
    }
}

fn unit(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_when_missing() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            sound_enabled: false,
            ..Settings::default()
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_partial_and_out_of_range_values() {
        let mut store = MemoryStore::new();
        store.set_item(Settings::STORAGE_KEY, r#"{"haptics_enabled":false,"master_volume":3.0}"#);
        let settings = Settings::load(&store);
        assert!(settings.sound_enabled);
        assert!(!settings.haptics_enabled);
        assert_eq!(settings.master_volume, 1.0);
    }

    #[test]
    fn test_garbage_falls_back_to_defaults() {
        let mut store = MemoryStore::new();
        store.set_item(Settings::STORAGE_KEY, "][");
        assert_eq!(Settings::load(&store), Settings::default());
    }
}
