//! String key-value persistence
//!
//! Features:
//! - `MemoryStore` for tests and as a fallback when nothing else is available
//! - `JsonFileStore` on native: one JSON object, written through on every set
//! - `LocalStorage` on the web
//!
//! Store reads and writes never fail outward. A broken backend logs a warning
//! and behaves as if the key were absent.

use std::collections::BTreeMap;

mod file;
#[cfg(target_arch = "wasm32")]
mod web;

pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

/// Errors from opening or flushing a backing store
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Synchronous string key-value store
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str);
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) {
        (**self).set_item(key, value)
    }
}
