//! Key-value backends for the session store.

use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::StorageError;

/// Minimal string key-value persistence
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write several entries in one operation
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError>;

    /// Remove several keys in one operation; absent keys are ignored
    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError>;
}

/// In-memory backend
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut map = self.entries.write();
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut map = self.entries.write();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

/// JSON object file backend.
///
/// The file is re-read on every access so that a session written by another
/// invocation is visible. Writes go to a sibling temp file which is then
/// renamed over the original.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`. Parent directories are
    /// created immediately.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        tracing::debug!(path = %path.display(), "opened session file");
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| StorageError::Corrupt(e.to_string()))
    }

    /// Current entries for a read-modify-write. Unparseable contents are
    /// discarded so that the write replaces them.
    fn load_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.load() {
            Err(StorageError::Corrupt(reason)) => {
                tracing::warn!(path = %self.path.display(), %reason, "overwriting unreadable session file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn persist(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let json =
            serde_json::to_string_pretty(map).map_err(|e| StorageError::Corrupt(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;

        // The file holds a bearer token: owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&tmp)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&tmp, perms)?;
        }

        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        let mut map = self.load_for_write()?;
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        self.persist(&map)
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        let mut map = self.load_for_write()?;
        for key in keys {
            map.remove(*key);
        }
        self.persist(&map)
    }
}
