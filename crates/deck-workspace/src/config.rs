// Workspace persistence: one JSON document holding the cell and window
// records plus both z-order bands, stored in the platform config dir,
// e.g. ~/.config/deck/workspace.json on Linux.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use deck_core::{CellId, WindowId};
use deck_layout::{CleanCell, CleanWindow};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(rename = "cellsConfig", default)]
    pub cells: HashMap<CellId, CleanCell>,
    #[serde(rename = "windowsConfig", default)]
    pub windows: HashMap<WindowId, CleanWindow>,
    #[serde(rename = "pinnedZIndexConfig", default)]
    pub pinned_ranks: HashMap<WindowId, i32>,
    #[serde(rename = "unpinnedZIndexConfig", default)]
    pub unpinned_ranks: HashMap<WindowId, i32>,
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("deck").join("workspace.json"))
}

pub fn load_config() -> Option<WorkspaceConfig> {
    let path = config_path()?;
    let data = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => Some(config),
        Err(e) => {
            log::warn!("Failed to parse {}: {}", path.display(), e);
            None
        }
    }
}

pub fn save_config(config: &WorkspaceConfig) {
    let path = match config_path() {
        Some(p) => p,
        None => {
            log::warn!("Cannot determine workspace config path");
            return;
        }
    };

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            log::error!("Failed to create config dir {}: {}", parent.display(), e);
            return;
        }
    }

    match serde_json::to_string_pretty(config) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&path, json) {
                log::error!("Failed to write {}: {}", path.display(), e);
            }
        }
        Err(e) => {
            log::error!("Failed to serialize workspace config: {}", e);
        }
    }
}
