//! Key-value backends for progress storage

use crate::error::{ProgressError, ProgressResult};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// String key to string value storage
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or None if the key is absent
    fn get(&self, key: &str) -> ProgressResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> ProgressResult<()>;

    /// Removing an absent key is not an error
    fn remove(&self, key: &str) -> ProgressResult<()>;
}

/// In-process store, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> ProgressResult<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ProgressResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ProgressResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory
///
/// Writes go through a temporary file in the same directory that is then
/// renamed over the target, so a crash never leaves a half-written entry.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created lazily on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> ProgressResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(ProgressError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn ensure_dir(&self) -> ProgressResult<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| ProgressError::DirectoryCreationError {
                path: self.dir.clone(),
                source: e,
            })?;
            log::info!("Created progress directory: {}", self.dir.display());
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> ProgressResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ProgressError::ReadError { path, source: e }),
        }
    }

    fn set(&self, key: &str, value: &str) -> ProgressResult<()> {
        let path = self.path_for(key)?;
        self.ensure_dir()?;

        let write_err = |source: std::io::Error| ProgressError::WriteError {
            path: path.clone(),
            source,
        };

        let mut temp = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        temp.write_all(value.as_bytes()).map_err(write_err)?;
        temp.flush().map_err(write_err)?;
        temp.persist(&path).map_err(|e| write_err(e.error))?;

        log::debug!("Wrote {}", path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> ProgressResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ProgressError::WriteError { path, source: e }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.len(), 1);

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::new(temp_dir.path().join("progress"));

        assert_eq!(store.get("story_progress_a_b").unwrap(), None);
        store.set("story_progress_a_b", "{}").unwrap();
        assert!(temp_dir
            .path()
            .join("progress")
            .join("story_progress_a_b.json")
            .exists());
        assert_eq!(store.get("story_progress_a_b").unwrap().as_deref(), Some("{}"));

        store.set("story_progress_a_b", "[]").unwrap();
        assert_eq!(store.get("story_progress_a_b").unwrap().as_deref(), Some("[]"));

        store.remove("story_progress_a_b").unwrap();
        assert_eq!(store.get("story_progress_a_b").unwrap(), None);
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::new(temp_dir.path());

        for key in ["", "../escape", "a/b", "dot.json"] {
            assert!(matches!(store.set(key, "x"), Err(ProgressError::InvalidKey(_))));
        }
    }

    #[test]
    fn test_file_store_leaves_no_temp_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::new(temp_dir.path());
        store.set("one", "1").unwrap();
        store.set("two", "2").unwrap();

        let count = fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(count, 2);
    }
}
