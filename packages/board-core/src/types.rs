use serde::{Deserialize, Serialize};

/// Default title given to a column created by `add_column`.
pub const DEFAULT_COLUMN_TITLE: &str = "New column";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 3] = [ItemStatus::Todo, ItemStatus::InProgress, ItemStatus::Done];

    /// Sort rank used by `sort_items_by_status`.
    pub fn rank(self) -> u8 {
        match self {
            ItemStatus::Todo => 0,
            ItemStatus::InProgress => 1,
            ItemStatus::Done => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Todo => "todo",
            ItemStatus::InProgress => "inProgress",
            ItemStatus::Done => "done",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: ItemStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    #[serde(alias = "cardId")]
    pub id: String,
    pub title: String,
    #[serde(default, alias = "tasks")]
    pub items: Vec<Item>,
}

impl Column {
    pub fn item_index(&self, item_id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == item_id)
    }

    pub fn item(&self, item_id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn item_mut(&mut self, item_id: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    #[serde(default, alias = "cards")]
    pub columns: Vec<Column>,
}

impl Board {
    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.id == column_id)
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.id == column_id)
    }

    pub fn column_mut(&mut self, column_id: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|col| col.id == column_id)
    }

    /// Total number of items across all columns.
    pub fn item_count(&self) -> usize {
        self.columns.iter().map(|col| col.items.len()).sum()
    }
}

/// Identifiers of the item currently being dragged.
///
/// Both ids are set together and cleared together. A persisted session with
/// only one side present is treated as inactive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragSession {
    #[serde(default, alias = "sourceCardId")]
    pub source_column_id: Option<String>,
    #[serde(default, alias = "sourceTaskId")]
    pub source_item_id: Option<String>,
}

impl DragSession {
    pub fn new(column_id: &str, item_id: &str) -> Self {
        Self {
            source_column_id: Some(column_id.to_string()),
            source_item_id: Some(item_id.to_string()),
        }
    }

    /// `(column_id, item_id)` when both sides of the session are set.
    pub fn active(&self) -> Option<(&str, &str)> {
        match (&self.source_column_id, &self.source_item_id) {
            (Some(col), Some(item)) => Some((col.as_str(), item.as_str())),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active().is_some()
    }

    pub fn clear(&mut self) {
        self.source_column_id = None;
        self.source_item_id = None;
    }
}

/// Complete persisted state: the board plus the drag session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    #[serde(flatten)]
    pub board: Board,
    #[serde(default, alias = "dragInfo")]
    pub drag_session: DragSession,
}

impl BoardSnapshot {
    /// Seed board used when nothing usable is persisted: two columns with
    /// six items each, two per status.
    pub fn seed() -> Self {
        let columns = [("card1", ""), ("card2", " c2")]
            .into_iter()
            .map(|(column_id, suffix)| Column {
                id: column_id.to_string(),
                title: column_id.to_string(),
                items: (1..=6)
                    .map(|n| Item {
                        id: format!("t{}{}", n, suffix),
                        title: format!("task {}", n),
                        description: format!("task {}{}", n, suffix),
                        status: ItemStatus::ALL[(n - 1) / 2],
                    })
                    .collect(),
            })
            .collect();

        Self {
            board: Board { columns },
            drag_session: DragSession::default(),
        }
    }
}
