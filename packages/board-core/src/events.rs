/// Change notifications published by the board store.
use serde::{Deserialize, Serialize};

use crate::types::ItemStatus;

/// One accepted mutation. Emitted after the board has changed and before the
/// next entry point runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum BoardEvent {
    ColumnAdded {
        column_id: String,
    },
    ColumnRenamed {
        column_id: String,
        title: String,
    },
    ColumnRemoved {
        column_id: String,
        removed_items: usize,
    },
    ColumnMoved {
        column_id: String,
        index: usize,
    },
    ItemAdded {
        column_id: String,
        item_id: String,
    },
    ItemRemoved {
        column_id: String,
        item_id: String,
    },
    ItemEdited {
        column_id: String,
        item_id: String,
    },
    StatusChanged {
        column_id: String,
        item_ids: Vec<String>,
        status: ItemStatus,
    },
    ItemsSorted {
        column_id: String,
    },
    ItemMoved {
        item_id: String,
        from_column: String,
        to_column: String,
        index: usize,
    },
    DragStarted {
        column_id: String,
        item_id: String,
    },
    DragCleared,
}

impl BoardEvent {
    /// Drag-session changes that leave columns and items untouched.
    pub fn is_drag_only(&self) -> bool {
        matches!(self, BoardEvent::DragStarted { .. } | BoardEvent::DragCleared)
    }
}
