/// In-memory storage backend.
///
/// Holds the serialized JSON text rather than the snapshot value so that
/// reads go through the same decoding path as the on-disk backend.
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{SnapshotStorage, StorageError};
use crate::types::BoardSnapshot;

#[derive(Default)]
pub struct MemoryStorage {
    data: Mutex<Option<String>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text as if a previous session had written it.
    pub fn set_raw(&self, raw: &str) {
        *self.data.lock().unwrap() = Some(raw.to_string());
    }

    pub fn raw(&self) -> Option<String> {
        self.data.lock().unwrap().clone()
    }

    /// Make every subsequent write fail with an IO error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl SnapshotStorage for MemoryStorage {
    fn read_snapshot(&self) -> Result<Option<BoardSnapshot>, StorageError> {
        match self.data.lock().unwrap().as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn write_snapshot(&self, snapshot: &BoardSnapshot) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "write rejected",
            )));
        }
        let raw = serde_json::to_string(snapshot)?;
        *self.data.lock().unwrap() = Some(raw);
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
