use std::{
    collections::BTreeMap, fs, io::ErrorKind as IoErrorKind, path::{Path, PathBuf}, sync::Mutex
};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{StorageError, StorageResult};

/// Storage backend type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-process map, lost on exit (tests, embedding)
    Memory,
    /// JSON object file shared by every client using the same path
    File(PathBuf),
    /// No-op mode - for when storage is disabled or unavailable
    None,
}

/// Client-side key/value storage, the equivalent of a browser's localStorage.
///
/// Access is synchronous. File storage re-reads the file on every access so
/// concurrent processes see each other's writes (last write wins).
pub struct ClientStorage {
    storage_type: StorageType,
    memory: Mutex<BTreeMap<String, String>>,
}

impl ClientStorage {
    /// Create a new ClientStorage instance with the specified storage type
    pub fn new(storage_type: StorageType) -> Self {
        Self {
            storage_type,
            memory: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn memory() -> Self {
        Self::new(StorageType::Memory)
    }

    pub fn storage_type(&self) -> &StorageType {
        &self.storage_type
    }

    /// Get a value from storage by key
    pub fn get(&self, key: &str) -> Option<String> {
        match &self.storage_type {
            StorageType::None => None,
            StorageType::Memory => self.lock_memory().get(key).cloned(),
            StorageType::File(path) => match read_file(path) {
                Ok(mut map) => map.remove(key),
                Err(e) => {
                    warn!(error = %e, key, "failed to read storage");
                    None
                }
            },
        }
    }

    /// Set a value in storage
    pub fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        match &self.storage_type {
            StorageType::None => Ok(()),
            StorageType::Memory => {
                self.lock_memory().insert(key.to_string(), value.to_string());
                Ok(())
            }
            StorageType::File(path) => {
                let _guard = self.lock_memory();
                let mut map = read_file(path)?;
                map.insert(key.to_string(), value.to_string());
                write_file(path, &map)
            }
        }
    }

    /// Remove a value from storage
    pub fn remove(&self, key: &str) -> StorageResult<()> {
        match &self.storage_type {
            StorageType::None => Ok(()),
            StorageType::Memory => {
                self.lock_memory().remove(key);
                Ok(())
            }
            StorageType::File(path) => {
                let _guard = self.lock_memory();
                let mut map = read_file(path)?;
                if map.remove(key).is_some() {
                    write_file(path, &map)?;
                }
                Ok(())
            }
        }
    }

    /// Clear all items from storage
    pub fn clear(&self) -> StorageResult<()> {
        match &self.storage_type {
            StorageType::None => Ok(()),
            StorageType::Memory => {
                self.lock_memory().clear();
                Ok(())
            }
            StorageType::File(path) => {
                let _guard = self.lock_memory();
                write_file(path, &BTreeMap::new())
            }
        }
    }

    /// Get all keys from storage, sorted
    pub fn keys(&self) -> Vec<String> {
        match &self.storage_type {
            StorageType::None => Vec::new(),
            StorageType::Memory => self.lock_memory().keys().cloned().collect(),
            StorageType::File(path) => read_file(path).map(|m| m.into_keys().collect()).unwrap_or_default(),
        }
    }

    /// Get and deserialize a JSON value from storage
    pub fn get_json<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_str(&value) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(error = %e, key, "failed to parse JSON from storage");
                None
            }
        }
    }

    /// Serialize and set a JSON value in storage
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        let json = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.set(key, &json)
    }

    fn lock_memory(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map is still a valid map
        self.memory.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn read_file(path: &Path) -> StorageResult<BTreeMap<String, String>> {
    match fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
        Ok(contents) => serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
            path: path.display().to_string(),
            source,
        }),
        Err(e) if e.kind() == IoErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(source) => Err(StorageError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

fn write_file(path: &Path, map: &BTreeMap<String, String>) -> StorageResult<()> {
    let io_err = |source: std::io::Error| StorageError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(map).map_err(|source| StorageError::Serialize {
        key: "*".to_string(),
        source,
    })?;
    fs::write(path, json).map_err(io_err)?;
    ensure_secure_permissions(path).map_err(io_err)
}

/// The file holds a bearer token; keep it 0600 on Unix
fn ensure_secure_permissions(path: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path)?;
        if metadata.permissions().mode() & 0o777 != 0o600 {
            let mut perms = metadata.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        let _ = path;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_roundtrip() {
        let storage = ClientStorage::memory();
        assert_eq!(storage.get("token"), None);
        storage.set("token", "abc").unwrap();
        storage.set("preferences", "{}").unwrap();
        assert_eq!(storage.get("token").as_deref(), Some("abc"));
        assert_eq!(storage.keys(), vec!["preferences".to_string(), "token".to_string()]);
        storage.remove("token").unwrap();
        assert_eq!(storage.get("token"), None);
        storage.clear().unwrap();
        assert!(storage.keys().is_empty());
    }

    #[test]
    fn none_storage_is_inert() {
        let storage = ClientStorage::new(StorageType::None);
        storage.set("token", "abc").unwrap();
        assert_eq!(storage.get("token"), None);
        assert!(storage.keys().is_empty());
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let a = ClientStorage::new(StorageType::File(path.clone()));
        a.set("token", "t-1").unwrap();
        a.set_json("preferences", &serde_json::json!({"darkMode": true})).unwrap();

        let b = ClientStorage::new(StorageType::File(path.clone()));
        assert_eq!(b.get("token").as_deref(), Some("t-1"));
        let prefs: serde_json::Value = b.get_json("preferences").unwrap();
        assert_eq!(prefs["darkMode"], true);

        b.remove("token").unwrap();
        assert_eq!(a.get("token"), None);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, 0o600);
        }
    }

    #[test]
    fn corrupt_file_reads_as_missing_and_fails_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();

        let storage = ClientStorage::new(StorageType::File(path));
        assert_eq!(storage.get("token"), None);
        assert!(matches!(storage.set("token", "x"), Err(StorageError::Corrupt { .. })));
    }

    #[test]
    fn bad_json_value_is_ignored() {
        let storage = ClientStorage::memory();
        storage.set("preferences", "{oops").unwrap();
        assert_eq!(storage.get_json::<serde_json::Value>("preferences"), None);
    }
}
