use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::{BotConfig, ConsoleConfig};

pub fn settings_path(config: &ConsoleConfig) -> PathBuf {
    config.data_dir.join("bot-config.json")
}

/// Missing or unreadable files fall back to the built-in defaults; the
/// dashboard always has a config to show.
pub fn load_settings(path: &Path) -> BotConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => BotConfig::default(),
    }
}

pub fn save_settings(path: &Path, settings: &BotConfig) {
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!("Failed to create settings dir {:?}: {}", parent, e);
            return;
        }
    }
    match serde_json::to_string_pretty(settings) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, json) {
                warn!("Failed to save settings to {:?}: {}", path, e);
            }
        }
        Err(e) => {
            warn!("Failed to serialize settings: {}", e);
        }
    }
}
