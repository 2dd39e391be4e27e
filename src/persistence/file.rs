//! Native file-backed store

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, PersistenceError};

/// All keys in one pretty-printed JSON object on disk
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open `path`, treating a missing file as empty
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();
        let items = match fs::read_to_string(&path) {
            Ok(json) if json.trim().is_empty() => BTreeMap::new(),
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        log::info!("Opened store {} ({} keys)", path.display(), items.len());
        Ok(Self { path, items })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current contents through a temp file and rename
    pub fn flush(&self) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(&self.items)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush() {
            log::warn!("Failed to write {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "cosmic_catcher_{}_{}.json",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = scratch_path("reopen");
        let _ = fs::remove_file(&path);

        {
            let mut store = JsonFileStore::open(&path).expect("open");
            store.set_item("cosmic_catcher_highscore", "42");
        }
        let store = JsonFileStore::open(&path).expect("reopen");
        assert_eq!(store.get_item("cosmic_catcher_highscore").as_deref(), Some("42"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let path = scratch_path("missing");
        let _ = fs::remove_file(&path);
        let store = JsonFileStore::open(&path).expect("open");
        assert_eq!(store.get_item("anything"), None);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = scratch_path("corrupt");
        fs::write(&path, "{ not json").expect("write");
        assert!(matches!(
            JsonFileStore::open(&path),
            Err(PersistenceError::Json(_))
        ));
        let _ = fs::remove_file(&path);
    }
}
