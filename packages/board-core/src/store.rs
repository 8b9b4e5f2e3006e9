/// The board store: owner of the board state and the drag session.
///
/// Entry points run synchronously to completion. Operations addressing a
/// missing column or item are logged and ignored. Every mutation that
/// actually changes state is announced once: first to the registered
/// `StateObserver`s (persistence is one of them), then on the broadcast
/// channel returned by `subscribe`.
use tokio::sync::broadcast;

use crate::board::BoardError;
use crate::config::BoardConfig;
use crate::events::BoardEvent;
use crate::storage::local::LocalStorage;
use crate::storage::{Persistence, SnapshotStorage};
use crate::types::{Board, BoardSnapshot, Column, DragSession, Item, ItemStatus};

/// Post-mutation hook.
pub trait StateObserver {
    fn state_changed(&self, snapshot: &BoardSnapshot, event: &BoardEvent);
}

pub struct BoardStore {
    snapshot: BoardSnapshot,
    default_column_title: String,
    observers: Vec<Box<dyn StateObserver>>,
    event_tx: broadcast::Sender<BoardEvent>,
}

impl BoardStore {
    pub fn new(snapshot: BoardSnapshot) -> Self {
        Self::with_config(snapshot, &BoardConfig::default())
    }

    pub fn with_config(snapshot: BoardSnapshot, config: &BoardConfig) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            snapshot,
            default_column_title: config.default_column_title.clone(),
            observers: Vec::new(),
            event_tx,
        }
    }

    /// Load state through the persistence port and keep it installed so that
    /// every change is written back.
    pub fn open<S>(storage: S, config: &BoardConfig) -> Self
    where
        S: SnapshotStorage + 'static,
    {
        let persistence = Persistence::new(storage);
        let mut store = Self::with_config(persistence.load(), config);
        store.add_observer(Box::new(persistence));
        store
    }

    /// `open` with the local key-value store described by `config`.
    pub fn open_local(config: &BoardConfig) -> Self {
        let storage = LocalStorage::from_config(config);
        log::info!(
            "[board.store.open] Using snapshot file {:?}",
            storage.file_path()
        );
        Self::open(storage, config)
    }

    pub fn add_observer(&mut self, observer: Box<dyn StateObserver>) {
        self.observers.push(observer);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.event_tx.subscribe()
    }

    // ── Read access ─────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> &BoardSnapshot {
        &self.snapshot
    }

    pub fn board(&self) -> &Board {
        &self.snapshot.board
    }

    pub fn columns(&self) -> &[Column] {
        &self.snapshot.board.columns
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.snapshot.board.column(column_id)
    }

    pub fn drag_session(&self) -> &DragSession {
        &self.snapshot.drag_session
    }

    /// Columns an item of `column_id` can be sent to.
    pub fn transfer_targets(&self, column_id: &str) -> Vec<(&str, &str)> {
        self.snapshot.board.transfer_targets(column_id)
    }

    pub fn find_item(&self, item_id: &str) -> Option<(&str, &Item)> {
        self.snapshot.board.find_item(item_id)
    }

    // ── Columns ─────────────────────────────────────────────────────────────

    pub fn add_column(&mut self) -> String {
        let column_id = self.snapshot.board.add_column(&self.default_column_title);
        self.commit(BoardEvent::ColumnAdded {
            column_id: column_id.clone(),
        });
        column_id
    }

    pub fn edit_column_title(&mut self, column_id: &str, title: &str) -> bool {
        let result = self.snapshot.board.edit_column_title(column_id, title);
        self.accept("edit_column_title", result, || BoardEvent::ColumnRenamed {
            column_id: column_id.to_string(),
            title: title.to_string(),
        })
        .is_some()
    }

    pub fn remove_column(&mut self, column_id: &str) -> bool {
        let result = self.snapshot.board.remove_column(column_id);
        let Some(removed) = ignore_not_found("remove_column", result) else {
            return false;
        };
        self.commit(BoardEvent::ColumnRemoved {
            column_id: removed.id,
            removed_items: removed.items.len(),
        });
        true
    }

    /// Relocate a column; `None` or an unknown target appends it.
    pub fn move_column(&mut self, source_column_id: &str, target_column_id: Option<&str>) -> bool {
        let result = self
            .snapshot
            .board
            .move_column(source_column_id, target_column_id);
        match ignore_not_found("move_column", result) {
            Some(Some(index)) => {
                self.commit(BoardEvent::ColumnMoved {
                    column_id: source_column_id.to_string(),
                    index,
                });
                true
            }
            _ => false,
        }
    }

    // ── Items ───────────────────────────────────────────────────────────────

    pub fn add_item(&mut self, column_id: &str, title: &str, description: &str) -> Option<String> {
        let result = self.snapshot.board.add_item(column_id, title, description);
        let item_id = ignore_not_found("add_item", result)?;
        self.commit(BoardEvent::ItemAdded {
            column_id: column_id.to_string(),
            item_id: item_id.clone(),
        });
        Some(item_id)
    }

    pub fn remove_item(&mut self, column_id: &str, item_id: &str) -> bool {
        let result = self.snapshot.board.remove_item(column_id, item_id);
        self.accept("remove_item", result, || BoardEvent::ItemRemoved {
            column_id: column_id.to_string(),
            item_id: item_id.to_string(),
        })
        .is_some()
    }

    /// Empty or absent values leave the field unchanged.
    pub fn edit_item(
        &mut self,
        column_id: &str,
        item_id: &str,
        title: Option<&str>,
        description: Option<&str>,
    ) -> bool {
        let result = self
            .snapshot
            .board
            .edit_item(column_id, item_id, title, description);
        if ignore_not_found("edit_item", result) != Some(true) {
            return false;
        }
        self.commit(BoardEvent::ItemEdited {
            column_id: column_id.to_string(),
            item_id: item_id.to_string(),
        });
        true
    }

    pub fn change_status(&mut self, column_id: &str, item_id: &str, status: ItemStatus) -> bool {
        let result = self.snapshot.board.change_status(column_id, item_id, status);
        self.accept("change_status", result, || BoardEvent::StatusChanged {
            column_id: column_id.to_string(),
            item_ids: vec![item_id.to_string()],
            status,
        })
        .is_some()
    }

    /// Set one status on every item of a column.
    pub fn change_status_all(&mut self, column_id: &str, status: ItemStatus) -> bool {
        let result = self.snapshot.board.change_status_all(column_id, status);
        if ignore_not_found("change_status_all", result).is_none() {
            return false;
        }
        let item_ids = self
            .column(column_id)
            .map(|col| col.items.iter().map(|item| item.id.clone()).collect())
            .unwrap_or_default();
        self.commit(BoardEvent::StatusChanged {
            column_id: column_id.to_string(),
            item_ids,
            status,
        });
        true
    }

    pub fn sort_items_by_status(&mut self, column_id: &str) -> bool {
        let result = self.snapshot.board.sort_items_by_status(column_id);
        self.accept("sort_items_by_status", result, || BoardEvent::ItemsSorted {
            column_id: column_id.to_string(),
        })
        .is_some()
    }

    /// Relocate the item named by the active drag session.
    ///
    /// Does nothing without an active session. A session that points at a
    /// column or item that no longer exists is cleared.
    pub fn move_item(
        &mut self,
        target_column_id: &str,
        target_item_id: Option<&str>,
        drop_above: bool,
    ) -> bool {
        let Some((source_column_id, source_item_id)) = self
            .snapshot
            .drag_session
            .active()
            .map(|(col, item)| (col.to_string(), item.to_string()))
        else {
            log::debug!("[board.store.move] No active drag session, ignoring move");
            return false;
        };

        let result = self.snapshot.board.move_item(
            &source_column_id,
            &source_item_id,
            target_column_id,
            target_item_id,
            drop_above,
        );

        match result {
            Ok(Some(index)) => {
                self.commit(BoardEvent::ItemMoved {
                    item_id: source_item_id,
                    from_column: source_column_id,
                    to_column: target_column_id.to_string(),
                    index,
                });
                true
            }
            Ok(None) => false,
            Err(e) => {
                log::warn!("[board.store.move] Ignored: {}", e);
                let source_exists = self
                    .column(&source_column_id)
                    .and_then(|col| col.item(&source_item_id))
                    .is_some();
                if !source_exists {
                    self.clear_drag_session();
                }
                false
            }
        }
    }

    /// Send an item to the top of another column. Unlike the other entry
    /// points, missing ids are reported to the caller.
    pub fn transfer_item(
        &mut self,
        source_column_id: &str,
        target_column_id: &str,
        item_id: &str,
    ) -> Result<(), BoardError> {
        if let Err(e) = self
            .snapshot
            .board
            .transfer_item(source_column_id, target_column_id, item_id)
        {
            log::warn!("[board.store.transfer_item] Rejected: {}", e);
            return Err(e);
        }
        self.commit(BoardEvent::ItemMoved {
            item_id: item_id.to_string(),
            from_column: source_column_id.to_string(),
            to_column: target_column_id.to_string(),
            index: 0,
        });
        Ok(())
    }

    // ── Drag session ────────────────────────────────────────────────────────

    /// Record the dragged item, replacing any earlier session.
    pub fn set_drag_session(&mut self, column_id: &str, item_id: &str) {
        self.snapshot.drag_session = DragSession::new(column_id, item_id);
        self.commit(BoardEvent::DragStarted {
            column_id: column_id.to_string(),
            item_id: item_id.to_string(),
        });
    }

    pub fn clear_drag_session(&mut self) {
        if self.snapshot.drag_session == DragSession::default() {
            return;
        }
        self.snapshot.drag_session.clear();
        self.commit(BoardEvent::DragCleared);
    }

    // ── Notification ────────────────────────────────────────────────────────

    fn accept<T>(
        &mut self,
        op: &str,
        result: Result<T, BoardError>,
        event: impl FnOnce() -> BoardEvent,
    ) -> Option<T> {
        let value = ignore_not_found(op, result)?;
        self.commit(event());
        Some(value)
    }

    fn commit(&mut self, event: BoardEvent) {
        log::debug!("[board.store.commit] {:?}", event);
        for observer in &self.observers {
            observer.state_changed(&self.snapshot, &event);
        }
        // No receivers is fine.
        let _ = self.event_tx.send(event);
    }
}

fn ignore_not_found<T>(op: &str, result: Result<T, BoardError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("[board.store.{}] Ignored: {}", op, e);
            None
        }
    }
}
