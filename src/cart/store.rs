//! Persistent key-value port for the cart record
//!
//! The cart logic only needs `read(key)` and `write(key, value)`. Two
//! implementations are provided: an in-process map and a directory of JSON
//! files written atomically.

use crate::error::StoreError;
use dashmap::DashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Minimal persistent string store
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

// =============================================================================
// In-memory
// =============================================================================

/// Process-local store. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// DashMap allows concurrent access without external Mutexes.
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// File-backed
// =============================================================================

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a temporary sibling file which is synced and then renamed
/// over the target, so readers never observe a half-written record.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`. Characters outside `[A-Za-z0-9_-]`
    /// are replaced so keys cannot escape the directory.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_stem: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", file_stem))
    }
}

impl KeyValueStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");

        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(value.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.read("cart").unwrap().is_none());

        store.write("cart", "{}").unwrap();
        store.write("cart", "{\"items\":[]}").unwrap();
        assert_eq!(store.read("cart").unwrap().as_deref(), Some("{\"items\":[]}"));
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let first = JsonFileStore::new(dir.path().join("nested"));
        assert!(first.read("walmart-cart").unwrap().is_none());

        first.write("walmart-cart", "{\"items\":[]}").unwrap();

        let second = JsonFileStore::new(dir.path().join("nested"));
        assert_eq!(
            second.read("walmart-cart").unwrap().as_deref(),
            Some("{\"items\":[]}")
        );
        assert!(!second.path_for("walmart-cart").with_extension("json.tmp").exists());
    }

    #[test]
    fn file_store_sanitizes_keys() {
        let store = JsonFileStore::new("/tmp/carts");
        assert_eq!(
            store.path_for("../etc/passwd"),
            PathBuf::from("/tmp/carts/___etc_passwd.json")
        );
    }

    #[test]
    fn blank_files_read_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        fs::write(store.path_for("cart"), "  \n").unwrap();
        assert!(store.read("cart").unwrap().is_none());
    }
}
