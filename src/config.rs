// Settings file and config paths

use crate::preview::DEFAULT_PREVIEW_DEBOUNCE_MS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_DIR_NAME: &str = "polyglot";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const SNIPPETS_FILE_NAME: &str = "snippets.json";

/// Overrides the config directory (tests, portable installs)
pub const CONFIG_DIR_ENV: &str = "POLYGLOT_CONFIG_DIR";

/// Errors from loading settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    ConfigDirNotFound,
    #[error("Failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn default_debounce_ms() -> u64 {
    DEFAULT_PREVIEW_DEBOUNCE_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

/// User settings, persisted as camelCase JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Snippet store location; defaults to `<config_dir>/snippets.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippets_file: Option<PathBuf>,
    #[serde(default = "default_debounce_ms")]
    pub preview_debounce_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snippets_file: None,
            preview_debounce_ms: default_debounce_ms(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from `path`; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                crate::debug!("No settings at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from the default location
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(&default_path()?)
    }

    /// Resolved snippet store path
    pub fn snippets_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.snippets_file {
            Some(path) => Ok(path.clone()),
            None => Ok(config_dir()?.join(SNIPPETS_FILE_NAME)),
        }
    }

    pub fn preview_debounce(&self) -> Duration {
        Duration::from_millis(self.preview_debounce_ms)
    }
}

/// Get the config directory
/// Returns $POLYGLOT_CONFIG_DIR, or {config_dir}/polyglot/
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let base = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(base.join(APP_DIR_NAME))
}

/// Default settings file path
pub fn default_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(SETTINGS_FILE_NAME))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
