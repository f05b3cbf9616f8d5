//! Local state store - the browser-storage analog.
//!
//! The storefront persists small pieces of per-shopper state (working
//! cart, applied coupon, order ledger) through the [`StateStore`] trait:
//! string keys to string values, with typed JSON helpers layered on top.
//! Keys are explicit (`orders:<user>`, `cart:<user>`, `couponCode`);
//! nothing ever scans the key space.
//!
//! Storage is best-effort by design: a failed write degrades the feature
//! (coupon not remembered, order not cached) instead of failing the
//! operation, and unreadable or corrupt values read back as absent.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Keyed string storage with last-write-wins semantics.
///
/// Implementations must tolerate concurrent readers and writers from
/// multiple tasks; two writers for the same key race benignly (the last
/// write wins), matching the multi-tab behavior of the storage this
/// replaces.
pub trait StateStore: Send + Sync {
    /// Read the value for `key`, if present and readable.
    fn read(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`. Errors are logged and swallowed.
    fn write(&self, key: &str, value: &str);

    /// Remove `key` if present. Errors are logged and swallowed.
    fn remove(&self, key: &str);
}

/// Read and deserialize a JSON value, treating corrupt data as absent.
pub fn read_json<T: DeserializeOwned>(store: &dyn StateStore, key: &str) -> Option<T> {
    let raw = store.read(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "Discarding corrupt stored value");
            None
        }
    }
}

/// Serialize and write a JSON value. Serialization failures are logged
/// and swallowed like write failures.
pub fn write_json<T: Serialize>(store: &dyn StateStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => store.write(key, &raw),
        Err(e) => warn!(key, error = %e, "Failed to serialize value for storage"),
    }
}

// =============================================================================
// FileStore
// =============================================================================

/// File-backed store: one JSON file per key under a data directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    // Serializes writers so concurrent tasks cannot interleave a write
    // and a remove for the same key.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys contain ':' separators; map anything non-alphanumeric to
        // '_' so every key is a portable file name.
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }

    /// The directory backing this store.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl StateStore for FileStore {
    fn read(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn write(&self, key: &str, value: &str) {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = std::fs::write(self.path_for(key), value) {
            warn!(key, error = %e, "Failed to persist state");
        }
    }

    fn remove(&self, key: &str) {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let path = self.path_for(key);
        if path.exists()
            && let Err(e) = std::fs::remove_file(&path)
        {
            warn!(key, error = %e, "Failed to remove stored state");
        }
    }
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn write(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.read("couponCode"), None);
        store.write("couponCode", "7FOREVER");
        assert_eq!(store.read("couponCode"), Some("7FOREVER".to_string()));
        store.remove("couponCode");
        assert_eq!(store.read("couponCode"), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileStore::new(dir.path()).expect("file store");
        store.write("orders:guest", "[]");
        assert_eq!(store.read("orders:guest"), Some("[]".to_string()));
        store.remove("orders:guest");
        assert_eq!(store.read("orders:guest"), None);
    }

    #[test]
    fn test_file_store_sanitizes_keys() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileStore::new(dir.path()).expect("file store");
        store.write("orders:42", "x");
        assert!(dir.path().join("orders_42.json").exists());
    }

    #[test]
    fn test_read_json_treats_corrupt_value_as_absent() {
        let store = MemoryStore::new();
        store.write("orders:guest", "{not json");
        let parsed: Option<Vec<String>> = read_json(&store, "orders:guest");
        assert_eq!(parsed, None);
    }

    #[test]
    fn test_write_json_round_trip() {
        let store = MemoryStore::new();
        write_json(&store, "cart:guest", &vec![1, 2, 3]);
        let parsed: Option<Vec<i32>> = read_json(&store, "cart:guest");
        assert_eq!(parsed, Some(vec![1, 2, 3]));
    }
}
