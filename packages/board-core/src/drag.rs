//! Drag-and-drop coordination.
//!
//! Turns the gesture sequence drag-start → drag-over/leave → drop | drag-end
//! into calls on the `BoardStore`. The coordinator owns the typed payload of
//! the current gesture and the hovered drop target used for highlighting;
//! the store owns the drag session (which item is in flight).
//!
//! Every drop path and every drag-end returns the coordinator to idle,
//! clears the highlight and clears the store's drag session, whether or not
//! anything moved.

use crate::store::BoardStore;

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragPayload {
    Item { column_id: String, item_id: String },
    Column { column_id: String },
}

/// Where the pointer is, or where the drop landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Item { column_id: String, item_id: String },
    /// A column's header or the empty area below its items.
    Column { column_id: String },
    /// The board background outside every column.
    Board,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    ItemDragging,
    ColumnDragging,
}

/// Whether a start handler consumed the gesture. A nested item handler
/// returns `Stop` so its column's handler does not also start a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Stop,
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    ItemMoved,
    ColumnMoved,
    Ignored,
}

/// Vertical extent of the element under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropRect {
    pub top: f64,
    pub height: f64,
}

/// True when the pointer is in the upper half of `rect` (midpoint inclusive).
pub fn drop_above(pointer_y: f64, rect: DropRect) -> bool {
    pointer_y <= rect.top + rect.height / 2.0
}

#[derive(Debug, Default)]
pub struct DragCoordinator {
    payload: Option<DragPayload>,
    hover: Option<DropTarget>,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        match self.payload {
            None => DragPhase::Idle,
            Some(DragPayload::Item { .. }) => DragPhase::ItemDragging,
            Some(DragPayload::Column { .. }) => DragPhase::ColumnDragging,
        }
    }

    pub fn payload(&self) -> Option<&DragPayload> {
        self.payload.as_ref()
    }

    /// Drag started on an item. Records the drag session in the store.
    pub fn item_drag_start(
        &mut self,
        store: &mut BoardStore,
        column_id: &str,
        item_id: &str,
    ) -> Propagation {
        log::debug!("[board.drag.start] item {} in column {}", item_id, column_id);
        self.payload = Some(DragPayload::Item {
            column_id: column_id.to_string(),
            item_id: item_id.to_string(),
        });
        self.hover = None;
        store.set_drag_session(column_id, item_id);
        Propagation::Stop
    }

    /// Drag started on a column. Ignored when the gesture already carries an
    /// item payload.
    pub fn column_drag_start(&mut self, column_id: &str) -> Propagation {
        if let Some(DragPayload::Item { .. }) = self.payload {
            return Propagation::Continue;
        }
        log::debug!("[board.drag.start] column {}", column_id);
        self.payload = Some(DragPayload::Column {
            column_id: column_id.to_string(),
        });
        self.hover = None;
        Propagation::Stop
    }

    /// Pointer moved over `target`. Returns whether a drop there would be
    /// accepted; accepted targets become the highlighted drop target.
    pub fn drag_over(&mut self, target: &DropTarget) -> bool {
        match self.accepted_target(target) {
            Some(accepted) => {
                self.hover = Some(accepted);
                true
            }
            None => false,
        }
    }

    pub fn drag_leave(&mut self, target: &DropTarget) {
        if self.accepted_target(target).is_some_and(|t| self.hover.as_ref() == Some(&t)) {
            self.hover = None;
        }
    }

    /// Derived highlight flag for the presentation layer.
    pub fn is_drop_target(&self, target: &DropTarget) -> bool {
        self.hover.as_ref() == Some(target)
    }

    fn accepted_target(&self, target: &DropTarget) -> Option<DropTarget> {
        match (self.payload.as_ref()?, target) {
            (DragPayload::Item { .. }, DropTarget::Board) => None,
            (DragPayload::Item { .. }, _) => Some(target.clone()),
            (DragPayload::Column { column_id: source }, DropTarget::Item { column_id, .. })
            | (DragPayload::Column { column_id: source }, DropTarget::Column { column_id }) => {
                (source != column_id).then(|| DropTarget::Column {
                    column_id: column_id.clone(),
                })
            }
            (DragPayload::Column { .. }, DropTarget::Board) => Some(DropTarget::Board),
        }
    }

    /// Drop onto an item. An item payload lands above or below the target
    /// depending on the pointer position; a column payload moves the column
    /// to the item's column.
    pub fn drop_on_item(
        &mut self,
        store: &mut BoardStore,
        column_id: &str,
        item_id: &str,
        pointer_y: f64,
        rect: DropRect,
    ) -> DropOutcome {
        let outcome = match self.payload.take() {
            Some(DragPayload::Item { .. }) => {
                let above = drop_above(pointer_y, rect);
                moved(
                    store.move_item(column_id, Some(item_id), above),
                    DropOutcome::ItemMoved,
                )
            }
            Some(DragPayload::Column { column_id: source }) => {
                move_column(store, &source, Some(column_id))
            }
            None => DropOutcome::Ignored,
        };
        self.finish(store, outcome)
    }

    /// Drop onto a column's free area. An item payload is appended to the
    /// column, including its own column; a column payload takes this
    /// column's slot.
    pub fn drop_on_column(&mut self, store: &mut BoardStore, column_id: &str) -> DropOutcome {
        let outcome = match self.payload.take() {
            Some(DragPayload::Item { .. }) => moved(
                store.move_item(column_id, None, false),
                DropOutcome::ItemMoved,
            ),
            Some(DragPayload::Column { column_id: source }) => {
                move_column(store, &source, Some(column_id))
            }
            None => DropOutcome::Ignored,
        };
        self.finish(store, outcome)
    }

    /// Drop onto the board background: a dragged column goes to the end.
    /// Item payloads are not handled at board level.
    pub fn drop_on_board(&mut self, store: &mut BoardStore) -> DropOutcome {
        let outcome = match self.payload.take() {
            Some(DragPayload::Column { column_id: source }) => move_column(store, &source, None),
            Some(DragPayload::Item { item_id, .. }) => {
                log::debug!("[board.drag.drop] Item {} dropped on board, ignoring", item_id);
                DropOutcome::Ignored
            }
            None => DropOutcome::Ignored,
        };
        self.finish(store, outcome)
    }

    /// Gesture ended, with or without a drop.
    pub fn drag_end(&mut self, store: &mut BoardStore) {
        if self.payload.is_some() {
            log::debug!("[board.drag.end] Gesture ended without a drop");
        }
        self.finish(store, DropOutcome::Ignored);
    }

    fn finish(&mut self, store: &mut BoardStore, outcome: DropOutcome) -> DropOutcome {
        self.payload = None;
        self.hover = None;
        store.clear_drag_session();
        outcome
    }
}

fn moved(changed: bool, outcome: DropOutcome) -> DropOutcome {
    if changed {
        outcome
    } else {
        DropOutcome::Ignored
    }
}

fn move_column(store: &mut BoardStore, source: &str, target: Option<&str>) -> DropOutcome {
    if target == Some(source) {
        return DropOutcome::Ignored;
    }
    moved(store.move_column(source, target), DropOutcome::ColumnMoved)
}
