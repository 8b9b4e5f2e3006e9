/// Mutation operations on a `Board`.
///
/// Every operation addresses items through a `(column_id, item_id)` pair and
/// reports a missing id as `BoardError`. Callers that want the
/// silence-over-crash behavior (the store) log and drop those errors; the
/// board itself never changes when an operation returns `Err`.
use std::collections::HashSet;

use crate::identity;
use crate::types::{Board, Column, Item, ItemStatus};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Item {item_id} not found in column {column_id}")]
    ItemNotFound { column_id: String, item_id: String },

    #[error("Duplicate column id: {0}")]
    DuplicateColumnId(String),

    #[error("Duplicate item id {item_id} in column {column_id}")]
    DuplicateItemId { column_id: String, item_id: String },
}

impl BoardError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BoardError::ColumnNotFound(_) | BoardError::ItemNotFound { .. }
        )
    }
}

fn item_not_found(column_id: &str, item_id: &str) -> BoardError {
    BoardError::ItemNotFound {
        column_id: column_id.to_string(),
        item_id: item_id.to_string(),
    }
}

impl Board {
    fn require_column(&self, column_id: &str) -> Result<usize, BoardError> {
        self.column_index(column_id)
            .ok_or_else(|| BoardError::ColumnNotFound(column_id.to_string()))
    }

    fn require_column_mut(&mut self, column_id: &str) -> Result<&mut Column, BoardError> {
        self.column_mut(column_id)
            .ok_or_else(|| BoardError::ColumnNotFound(column_id.to_string()))
    }

    fn require_item_mut(&mut self, column_id: &str, item_id: &str) -> Result<&mut Item, BoardError> {
        self.require_column_mut(column_id)?
            .item_mut(item_id)
            .ok_or_else(|| item_not_found(column_id, item_id))
    }

    /// Append an empty column. Returns the generated id.
    pub fn add_column(&mut self, title: &str) -> String {
        let id = identity::new_column_id();
        self.columns.push(Column {
            id: id.clone(),
            title: title.to_string(),
            items: Vec::new(),
        });
        id
    }

    pub fn edit_column_title(&mut self, column_id: &str, title: &str) -> Result<(), BoardError> {
        self.require_column_mut(column_id)?.title = title.to_string();
        Ok(())
    }

    /// Remove a column together with all of its items.
    pub fn remove_column(&mut self, column_id: &str) -> Result<Column, BoardError> {
        let index = self.require_column(column_id)?;
        Ok(self.columns.remove(index))
    }

    /// Append a new `todo` item to a column. Returns the generated id.
    pub fn add_item(
        &mut self,
        column_id: &str,
        title: &str,
        description: &str,
    ) -> Result<String, BoardError> {
        let column = self.require_column_mut(column_id)?;
        let id = identity::new_item_id();
        column.items.push(Item {
            id: id.clone(),
            title: title.to_string(),
            description: description.to_string(),
            status: ItemStatus::Todo,
        });
        Ok(id)
    }

    pub fn remove_item(&mut self, column_id: &str, item_id: &str) -> Result<Item, BoardError> {
        let column = self.require_column_mut(column_id)?;
        let index = column
            .item_index(item_id)
            .ok_or_else(|| item_not_found(column_id, item_id))?;
        Ok(column.items.remove(index))
    }

    /// Update title and/or description. `None` and empty strings leave the
    /// field unchanged. Returns whether anything was applied.
    pub fn edit_item(
        &mut self,
        column_id: &str,
        item_id: &str,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<bool, BoardError> {
        let item = self.require_item_mut(column_id, item_id)?;
        let mut applied = false;
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            item.title = title.to_string();
            applied = true;
        }
        if let Some(description) = description.filter(|d| !d.is_empty()) {
            item.description = description.to_string();
            applied = true;
        }
        Ok(applied)
    }

    pub fn change_status(
        &mut self,
        column_id: &str,
        item_id: &str,
        status: ItemStatus,
    ) -> Result<(), BoardError> {
        self.require_item_mut(column_id, item_id)?.status = status;
        Ok(())
    }

    /// Set the status of every item in a column. Returns the item count.
    pub fn change_status_all(
        &mut self,
        column_id: &str,
        status: ItemStatus,
    ) -> Result<usize, BoardError> {
        let column = self.require_column_mut(column_id)?;
        for item in &mut column.items {
            item.status = status;
        }
        Ok(column.items.len())
    }

    /// Stable sort by status rank: todo, inProgress, done.
    pub fn sort_items_by_status(&mut self, column_id: &str) -> Result<(), BoardError> {
        self.require_column_mut(column_id)?
            .items
            .sort_by_key(|item| item.status.rank());
        Ok(())
    }

    /// Relocate the dragged item `(source_column_id, source_item_id)`.
    ///
    /// With no target item, or a target item that is not in the target
    /// column, the item is appended. Otherwise it is inserted above or below
    /// the target, with the target index taken after the source removal.
    /// Returns the new index, or `None` when the item ends up where it was
    /// (including a drop onto itself).
    pub fn move_item(
        &mut self,
        source_column_id: &str,
        source_item_id: &str,
        target_column_id: &str,
        target_item_id: Option<&str>,
        drop_above: bool,
    ) -> Result<Option<usize>, BoardError> {
        let source_index = self.require_column(source_column_id)?;
        let item_index = self.columns[source_index]
            .item_index(source_item_id)
            .ok_or_else(|| item_not_found(source_column_id, source_item_id))?;
        let target_index = self.require_column(target_column_id)?;

        if source_column_id == target_column_id && target_item_id == Some(source_item_id) {
            return Ok(None);
        }

        let item = self.columns[source_index].items.remove(item_index);
        let target = &mut self.columns[target_index];

        let insert_at = target_item_id
            .and_then(|id| target.item_index(id))
            .map(|index| if drop_above { index } else { index + 1 })
            .unwrap_or(target.items.len());

        target.items.insert(insert_at, item);
        if source_index == target_index && insert_at == item_index {
            return Ok(None);
        }
        Ok(Some(insert_at))
    }

    /// Move an item to the top of another column.
    pub fn transfer_item(
        &mut self,
        source_column_id: &str,
        target_column_id: &str,
        item_id: &str,
    ) -> Result<(), BoardError> {
        let source_index = self.require_column(source_column_id)?;
        let target_index = self.require_column(target_column_id)?;
        let item_index = self.columns[source_index]
            .item_index(item_id)
            .ok_or_else(|| item_not_found(source_column_id, item_id))?;

        let item = self.columns[source_index].items.remove(item_index);
        self.columns[target_index].items.insert(0, item);
        Ok(())
    }

    /// Relocate a column to the slot currently held by `target_column_id`
    /// (looked up after removing the source), or to the end when the target
    /// is `None` or unknown. Returns the new index, or `None` when the column
    /// keeps its position (including source and target being the same).
    pub fn move_column(
        &mut self,
        source_column_id: &str,
        target_column_id: Option<&str>,
    ) -> Result<Option<usize>, BoardError> {
        if target_column_id == Some(source_column_id) {
            return Ok(None);
        }

        let source_index = self.require_column(source_column_id)?;
        let column = self.columns.remove(source_index);

        let insert_at = target_column_id
            .and_then(|id| self.column_index(id))
            .unwrap_or(self.columns.len());

        self.columns.insert(insert_at, column);
        if insert_at == source_index {
            return Ok(None);
        }
        Ok(Some(insert_at))
    }

    /// `(id, title)` of every column other than `column_id`, in board order.
    pub fn transfer_targets(&self, column_id: &str) -> Vec<(&str, &str)> {
        self.columns
            .iter()
            .filter(|col| col.id != column_id)
            .map(|col| (col.id.as_str(), col.title.as_str()))
            .collect()
    }

    /// Board-wide lookup by item id alone. Returns the first match.
    pub fn find_item(&self, item_id: &str) -> Option<(&str, &Item)> {
        self.columns.iter().find_map(|col| {
            col.item(item_id).map(|item| (col.id.as_str(), item))
        })
    }

    /// Check id uniqueness: column ids board-wide, item ids per column.
    pub fn validate(&self) -> Result<(), BoardError> {
        let mut column_ids = HashSet::new();
        for column in &self.columns {
            if !column_ids.insert(column.id.as_str()) {
                return Err(BoardError::DuplicateColumnId(column.id.clone()));
            }
            let mut item_ids = HashSet::new();
            for item in &column.items {
                if !item_ids.insert(item.id.as_str()) {
                    return Err(BoardError::DuplicateItemId {
                        column_id: column.id.clone(),
                        item_id: item.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
