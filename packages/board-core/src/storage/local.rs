/// Local filesystem storage backend.
///
/// A small key-value store: each key is one JSON file inside the storage
/// directory. Writes are atomic (write to .tmp, fsync, rename) and skipped
/// when the serialized content matches the last write (SHA-256 comparison).
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sha2::{Digest, Sha256};

use super::{SnapshotStorage, StorageError};
use crate::config::BoardConfig;
use crate::types::BoardSnapshot;

pub struct LocalStorage {
    file_path: PathBuf,
    /// SHA-256 of the last content read from or written to `file_path`
    last_hash: Mutex<Option<String>>,
}

impl LocalStorage {
    /// Storage for `key` inside `dir`. The directory is created on first write.
    pub fn new(dir: &Path, key: &str) -> Self {
        Self {
            file_path: dir.join(format!("{}.json", sanitize_key(key))),
            last_hash: Mutex::new(None),
        }
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        Self::new(&config.storage_dir(), &config.storage_key)
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn content_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Atomic write with fsync: write to .tmp, fsync, rename, fsync directory.
    fn atomic_write(path: &Path, content: &str) -> Result<(), std::io::Error> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;

        if let Some(dir) = path.parent() {
            if let Ok(d) = fs::File::open(dir) {
                let _ = d.sync_all();
            }
        }
        Ok(())
    }
}

/// Keep keys usable as file names.
fn sanitize_key(key: &str) -> String {
    let cleaned: String = key
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "board".to_string()
    } else {
        cleaned
    }
}

impl SnapshotStorage for LocalStorage {
    fn read_snapshot(&self) -> Result<Option<BoardSnapshot>, StorageError> {
        let content = match fs::read_to_string(&self.file_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Err(StorageError::Malformed(format!(
                "{} is empty",
                self.file_path.display()
            )));
        }

        let snapshot = serde_json::from_str(&content)?;
        *self.last_hash.lock().unwrap() = Some(Self::content_hash(&content));
        Ok(Some(snapshot))
    }

    fn write_snapshot(&self, snapshot: &BoardSnapshot) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(snapshot)?;
        let hash = Self::content_hash(&content);

        let mut last_hash = self.last_hash.lock().unwrap();
        if last_hash.as_deref() == Some(hash.as_str()) && self.file_path.exists() {
            log::debug!(
                "[board.storage.local] Unchanged snapshot, skipping write to {:?}",
                self.file_path
            );
            return Ok(());
        }

        Self::atomic_write(&self.file_path, &content)?;
        *last_hash = Some(hash);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Persistence;
    use crate::types::DragSession;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_none() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path(), "kanbanState");
        assert!(storage.read_snapshot().unwrap().is_none());
        assert_eq!(storage.file_path(), dir.path().join("kanbanState.json"));
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path(), "kanbanState");
        let mut snapshot = BoardSnapshot::seed();
        snapshot.drag_session = DragSession::new("card2", "t3 c2");

        storage.write_snapshot(&snapshot).unwrap();
        assert!(!dir.path().join("kanbanState.json.tmp").exists());

        let reopened = LocalStorage::new(dir.path(), "kanbanState");
        assert_eq!(reopened.read_snapshot().unwrap(), Some(snapshot));
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = LocalStorage::new(&nested, "state");
        storage.write_snapshot(&BoardSnapshot::default()).unwrap();
        assert!(nested.join("state.json").exists());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_seed() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("kanbanState.json"), "{\"columns\": [").unwrap();
        let persistence = Persistence::new(LocalStorage::new(dir.path(), "kanbanState"));
        assert_eq!(persistence.load(), BoardSnapshot::seed());
    }

    #[test]
    fn test_empty_file_is_malformed() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("kanbanState.json"), "  \n").unwrap();
        let storage = LocalStorage::new(dir.path(), "kanbanState");
        assert!(matches!(
            storage.read_snapshot(),
            Err(StorageError::Malformed(_))
        ));
    }

    #[test]
    fn test_unchanged_write_is_skipped() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path(), "kanbanState");
        let snapshot = BoardSnapshot::seed();
        storage.write_snapshot(&snapshot).unwrap();
        let path = storage.file_path().to_path_buf();
        let modified = fs::metadata(&path).unwrap().modified().unwrap();

        storage.write_snapshot(&snapshot).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), modified);
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("kanban/state"), "kanban_state");
        assert_eq!(sanitize_key(""), "board");
    }
}
