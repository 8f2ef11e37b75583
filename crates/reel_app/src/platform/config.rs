use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reel_core::{UiSettings, DEFAULT_PLAYER_PAGE};
use reel_store::{
    SearchHistory, StoreKeys, ViewingHistory, DEFAULT_MAX_SEARCH_ITEMS, DEFAULT_MAX_VIEWING_ITEMS,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "reel.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReelConfig {
    pub store_dir: PathBuf,
    pub keys: StoreKeys,
    pub max_search_items: usize,
    pub max_viewing_items: usize,
    pub toast_hold_ms: u64,
    pub toast_exit_ms: u64,
    pub loading_timeout_ms: u64,
    pub player_page: String,
    pub log_destination: LogDestination,
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(".reel_store"),
            keys: StoreKeys::default(),
            max_search_items: DEFAULT_MAX_SEARCH_ITEMS,
            max_viewing_items: DEFAULT_MAX_VIEWING_ITEMS,
            toast_hold_ms: 3000,
            toast_exit_ms: 300,
            loading_timeout_ms: 30_000,
            player_page: DEFAULT_PLAYER_PAGE.to_string(),
            log_destination: LogDestination::default(),
        }
    }
}

impl ReelConfig {
    pub fn ui_settings(&self) -> UiSettings {
        UiSettings {
            toast_hold: Duration::from_millis(self.toast_hold_ms),
            toast_exit: Duration::from_millis(self.toast_exit_ms),
            loading_timeout: Duration::from_millis(self.loading_timeout_ms),
            player_page: self.player_page.clone(),
        }
    }

    pub fn search_history(&self) -> SearchHistory {
        SearchHistory::new(self.keys.search_history.clone(), self.max_search_items)
    }

    pub fn viewing_history(&self) -> ViewingHistory {
        ViewingHistory::new(self.keys.viewing_history.clone(), self.max_viewing_items)
    }
}

/// Reads the config file. A missing file means defaults.
pub fn read_config(path: &Path) -> Result<ReelConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(ReelConfig::default()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
