use super::SessionError;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// String key-value store with browser local-storage semantics.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError>;
    /// Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), SessionError>;
}

#[derive(Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> SessionError {
    SessionError::Storage(e.to_string())
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.items.read().map_err(poisoned)?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.items
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        self.items.write().map_err(poisoned)?.remove(key);
        Ok(())
    }
}

/// Keeps all items as one JSON object in a file, so state survives restarts.
pub struct FileStorage {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A file that cannot be parsed (e.g. cut short by a crash) reads as empty,
    /// so the next write replaces it instead of every read failing.
    fn load(&self) -> Result<HashMap<String, String>, SessionError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }
        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                log::warn!("⚠️  Ignoring unreadable storage file {}: {}", self.path.display(), e);
                Ok(HashMap::new())
            }
        }
    }

    /// Writes to a temp file in the same directory, then renames it over the
    /// target so readers never see a partial file.
    fn save(&self, items: &HashMap<String, String>) -> Result<(), SessionError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let raw = serde_json::to_string_pretty(items)
            .map_err(|e| SessionError::Storage(e.to_string()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(raw.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|e| SessionError::Storage(format!("{}: {}", self.path.display(), e)))?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        let _guard = self.lock.read().map_err(poisoned)?;
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let _guard = self.lock.write().map_err(poisoned)?;
        let mut items = self.load()?;
        items.insert(key.to_string(), value.to_string());
        self.save(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        let _guard = self.lock.write().map_err(poisoned)?;
        let mut items = self.load()?;
        if items.remove(key).is_some() {
            self.save(&items)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);
        storage.set_item("k", "v1").unwrap();
        storage.set_item("k", "v2").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v2"));
        storage.remove_item("k").unwrap();
        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile").join("storage.json");

        FileStorage::new(&path).set_item("session", "{}").unwrap();
        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get_item("session").unwrap().as_deref(), Some("{}"));

        reopened.remove_item("session").unwrap();
        assert_eq!(FileStorage::new(&path).get_item("session").unwrap(), None);
    }

    #[test]
    fn test_file_storage_recovers_from_truncated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, r#"{"session": "{\"id\":"#).unwrap();

        let storage = FileStorage::new(&path);
        assert_eq!(storage.get_item("session").unwrap(), None);

        storage.set_item("session", "fresh").unwrap();
        assert_eq!(storage.get_item("session").unwrap().as_deref(), Some("fresh"));
        let on_disk: HashMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 1);
    }

    #[test]
    fn test_file_storage_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("storage.json"));
        storage.set_item("a", "1").unwrap();
        storage.set_item("b", "2").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("absent.json"));
        assert_eq!(storage.get_item("session").unwrap(), None);
        storage.remove_item("session").unwrap();
        assert!(!storage.path().exists());
    }
}
