//! Key-value storage adapters.
//!
//! The content persists small strings through `saveToStorage` and
//! `getFromStorage`. The bridge only needs [`KeyValueStore`]; two adapters
//! are provided:
//!
//! | Adapter | Persistence |
//! |---------|-------------|
//! | [`MemoryStore`] | Process lifetime |
//! | [`FileStore`] | JSON file, atomically replaced on every write |

// ============================================================================
// Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// File name used by [`FileStore::open`].
pub const DEFAULT_STORE_FILE: &str = "BlazeSharedPref.json";

// ============================================================================
// KeyValueStore
// ============================================================================

/// String storage keyed by string.
pub trait KeyValueStore: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the value could not be stored.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the store could not be read.
    fn get(&self, key: &str) -> Result<Option<String>>;
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<FxHashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing is stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }
}

// ============================================================================
// FileStore
// ============================================================================

/// Store persisted as a JSON object on disk.
///
/// The whole map is kept in memory. Each write serializes it to a temporary
/// file next to the target and renames it over the target, so readers never
/// observe a partial file. A failed write leaves memory unchanged.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens `DEFAULT_STORE_FILE` inside `dir`.
    ///
    /// # Errors
    ///
    /// See [`FileStore::open_file`].
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open_file(dir.as_ref().join(DEFAULT_STORE_FILE))
    }

    /// Opens the store at `path`, creating it lazily on first write.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`] if the file exists but cannot be read
    /// - [`Error::Json`] if the file is not a JSON object of strings
    pub fn open_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let entries = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), keys = entries.len(), "File store opened");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Returns the backing file path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `entries` to disk atomically.
    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, entries)?;
        file.flush()?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        trace!(path = %self.path.display(), keys = entries.len(), "File store persisted");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock();

        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());

        self.persist(&next)
            .map_err(|e| Error::storage(key, e.to_string()))?;

        *entries = next;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("token", "abc").expect("set");
        store.set("token", "def").expect("overwrite");

        assert_eq!(store.get("token").expect("get"), Some("def".to_string()));
        assert_eq!(store.get("missing").expect("get"), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = TempDir::new().expect("temp dir");

        let store = FileStore::open(dir.path()).expect("open");
        store.set("session", "s-1").expect("set");
        store.set("theme", "dark").expect("set");
        drop(store);

        let reopened = FileStore::open(dir.path()).expect("reopen");
        assert_eq!(reopened.get("session").expect("get"), Some("s-1".into()));
        assert_eq!(reopened.get("theme").expect("get"), Some("dark".into()));
        assert_eq!(reopened.get("missing").expect("get"), None);
        assert_eq!(reopened.path(), dir.path().join(DEFAULT_STORE_FILE));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = TempDir::new().expect("temp dir");
        let store = FileStore::open(dir.path()).expect("open");

        assert_eq!(store.get("anything").expect("get"), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join(DEFAULT_STORE_FILE), "not json").expect("write");

        let err = FileStore::open(dir.path()).expect_err("corrupt file");
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_file_store_failed_write_keeps_memory() {
        let dir = TempDir::new().expect("temp dir");
        let store = FileStore::open_file(dir.path().join("gone").join("store.json")).expect("open");

        let err = store.set("k", "v").expect_err("parent dir missing");
        assert!(matches!(err, Error::Storage { ref key, .. } if key == "k"));
        assert_eq!(store.get("k").expect("get"), None);
    }
}
