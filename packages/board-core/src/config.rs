/// Configuration for the board core.
/// Reads config.json from ~/.config/board/config.json (or platform equivalent).
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::DEFAULT_COLUMN_TITLE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Directory of the local key-value store. Defaults to the platform data dir.
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_column_title")]
    pub default_column_title: String,
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_storage_key() -> String {
    "kanbanState".to_string()
}

fn default_column_title() -> String {
    DEFAULT_COLUMN_TITLE.to_string()
}

fn default_event_capacity() -> usize {
    64
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            storage_key: default_storage_key(),
            default_column_title: default_column_title(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl BoardConfig {
    /// Resolved storage directory: the configured one, else ~/.local/share/board.
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("board")
        })
    }
}

/// Default config path: ~/.config/board/config.json
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("board")
        .join("config.json")
}

/// Load config from path. Returns default if file doesn't exist or can't be parsed.
pub fn load_config(path: &Path) -> BoardConfig {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("[board.config] Failed to parse config {}: {}", path.display(), e);
            BoardConfig::default()
        }),
        Err(_) => {
            log::info!("[board.config] No config at {}, using defaults", path.display());
            BoardConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(&dir.path().join("nope.json"));
        assert_eq!(config, BoardConfig::default());
        assert_eq!(config.storage_key, "kanbanState");
        assert_eq!(config.event_capacity, 64);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"storage_dir": "/tmp/boards", "default_column_title": "Inbox"}"#)
            .unwrap();
        let config = load_config(&path);
        assert_eq!(config.storage_dir(), PathBuf::from("/tmp/boards"));
        assert_eq!(config.default_column_title, "Inbox");
        assert_eq!(config.storage_key, "kanbanState");
    }

    #[test]
    fn test_invalid_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "port = 3").unwrap();
        assert_eq!(load_config(&path), BoardConfig::default());
    }
}
