pub mod board;
pub mod config;
pub mod drag;
pub mod events;
pub mod identity;
pub mod search;
pub mod storage;
pub mod store;
pub mod types;

pub use board::BoardError;
pub use drag::{DragCoordinator, DropOutcome, DropRect, DropTarget};
pub use events::BoardEvent;
pub use store::{BoardStore, StateObserver};
pub use types::{Board, BoardSnapshot, Column, DragSession, Item, ItemStatus};
