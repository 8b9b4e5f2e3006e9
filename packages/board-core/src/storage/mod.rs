pub mod local;
pub mod memory;

use std::sync::Arc;

use crate::board::BoardError;
use crate::events::BoardEvent;
use crate::store::StateObserver;
use crate::types::BoardSnapshot;

/// Abstract storage trait for snapshot backends.
/// Implementations: LocalStorage (key-value files on disk), MemoryStorage (tests).
pub trait SnapshotStorage: Send + Sync {
    /// Read the persisted snapshot. `Ok(None)` when nothing has been stored yet.
    fn read_snapshot(&self) -> Result<Option<BoardSnapshot>, StorageError>;

    /// Replace the persisted snapshot.
    fn write_snapshot(&self, snapshot: &BoardSnapshot) -> Result<(), StorageError>;
}

impl<S: SnapshotStorage + ?Sized> SnapshotStorage for Arc<S> {
    fn read_snapshot(&self) -> Result<Option<BoardSnapshot>, StorageError> {
        (**self).read_snapshot()
    }

    fn write_snapshot(&self, snapshot: &BoardSnapshot) -> Result<(), StorageError> {
        (**self).write_snapshot(snapshot)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Malformed snapshot: {0}")]
    Malformed(String),

    #[error("Invalid board: {0}")]
    Board(#[from] BoardError),
}

/// The persistence port: load with fallback, save without propagation.
///
/// Installed on the store as a `StateObserver`, so every accepted mutation
/// writes the new snapshot. A failed write is logged and the in-memory state
/// stays authoritative.
pub struct Persistence<S> {
    storage: S,
}

impl<S: SnapshotStorage> Persistence<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load the persisted snapshot, or the seed board when nothing is stored
    /// or the stored data cannot be used.
    pub fn load(&self) -> BoardSnapshot {
        match self.storage.read_snapshot().and_then(check_snapshot) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                log::info!("[board.storage.load] No stored snapshot, using seed board");
                BoardSnapshot::seed()
            }
            Err(e) => {
                log::warn!(
                    "[board.storage.load] Unusable stored snapshot, using seed board: {}",
                    e
                );
                BoardSnapshot::seed()
            }
        }
    }

    /// Write a snapshot. Never fails from the caller's point of view.
    pub fn save(&self, snapshot: &BoardSnapshot) {
        if let Err(e) = self.storage.write_snapshot(snapshot) {
            log::error!("[board.storage.save] Failed to persist snapshot: {}", e);
        }
    }
}

/// Reject duplicate ids and drop a half-set drag session.
fn check_snapshot(snapshot: Option<BoardSnapshot>) -> Result<Option<BoardSnapshot>, StorageError> {
    let Some(mut snapshot) = snapshot else {
        return Ok(None);
    };
    snapshot.board.validate()?;
    if !snapshot.drag_session.is_active() {
        snapshot.drag_session.clear();
    }
    Ok(Some(snapshot))
}

impl<S: SnapshotStorage> StateObserver for Persistence<S> {
    fn state_changed(&self, snapshot: &BoardSnapshot, _event: &BoardEvent) {
        self.save(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryStorage;
    use super::*;
    use crate::types::{Column, DragSession};

    #[test]
    fn test_load_empty_falls_back_to_seed() {
        let persistence = Persistence::new(MemoryStorage::new());
        assert_eq!(persistence.load(), BoardSnapshot::seed());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let persistence = Persistence::new(MemoryStorage::new());
        let mut snapshot = BoardSnapshot::seed();
        snapshot.board.columns[0].title = "Renamed".into();
        snapshot.drag_session = DragSession::new("card1", "t2");

        persistence.save(&snapshot);
        assert_eq!(persistence.load(), snapshot);
    }

    #[test]
    fn test_load_duplicate_columns_falls_back() {
        let storage = MemoryStorage::new();
        let column = Column {
            id: "dup".into(),
            title: "x".into(),
            items: Vec::new(),
        };
        let mut snapshot = BoardSnapshot::default();
        snapshot.board.columns = vec![column.clone(), column];
        storage.write_snapshot(&snapshot).unwrap();

        let persistence = Persistence::new(storage);
        assert_eq!(persistence.load(), BoardSnapshot::seed());
    }

    #[test]
    fn test_load_clears_half_set_session() {
        let storage = MemoryStorage::new();
        let mut snapshot = BoardSnapshot::seed();
        snapshot.drag_session.source_item_id = Some("t1".into());
        storage.write_snapshot(&snapshot).unwrap();

        let loaded = Persistence::new(storage).load();
        assert_eq!(loaded.drag_session, DragSession::default());
        assert_eq!(loaded.board, snapshot.board);
    }

    #[test]
    fn test_save_failure_is_swallowed() {
        let storage = MemoryStorage::new();
        storage.fail_writes(true);
        let persistence = Persistence::new(storage);
        persistence.save(&BoardSnapshot::seed());
        assert_eq!(persistence.storage().write_count(), 0);
    }
}
