use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::view::{Tab, TaskFilter};

const STATE_FILE: &str = "state.json";

/// Persisted TUI state (written to state.json in the config directory)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiState {
    /// Active tab by name ("all", "today", "work", a list name, ...)
    #[serde(default)]
    pub tab: Tab,
    #[serde(default)]
    pub filter: TaskFilter,
    #[serde(default)]
    pub search: String,
}

/// Read state.json from the given directory
pub fn read_ui_state(dir: &Path) -> Option<UiState> {
    let path = dir.join(STATE_FILE);
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write state.json to the given directory, creating it if needed
pub fn write_ui_state(dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    fs::create_dir_all(dir)?;
    let path = dir.join(STATE_FILE);
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}
