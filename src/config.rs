//! Client configuration.
//!
//! Reads/writes `~/.carpool/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::storage::SessionStore;

/// Backend the mobile client talks to when nothing else is configured.
pub const DEFAULT_SERVER: &str = "https://carpooling-be-h414.onrender.com";

/// Client configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the users API.
    #[serde(default = "default_server")]
    pub server: String,

    /// Where the session key/value store lives. Defaults to the store's own
    /// home-directory location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_path: Option<PathBuf>,
}

fn default_server() -> String {
    DEFAULT_SERVER.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            session_path: None,
        }
    }
}

impl ClientConfig {
    /// Default config file path: `~/.carpool/config.toml`.
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".carpool").join("config.toml")
    }

    /// Load config from disk, or return defaults if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config = toml::from_str(&content).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        Ok(config)
    }

    /// Save config to disk.
    #[allow(dead_code)]
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    /// Resolved session-store path.
    pub fn session_store_path(&self) -> PathBuf {
        self.session_path
            .clone()
            .unwrap_or_else(SessionStore::default_path)
    }
}
