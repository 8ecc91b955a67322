//! Configuration types for Taskboard.
//!
//! This module provides the [`Config`] struct which says where boards live.
//! Configuration is persisted as TOML (typically at
//! `~/.config/taskboard/config.toml` on Unix systems).
//!
//! # Key Configuration Fields
//!
//! - `branch`: Branch holding the board files
//! - `data_dir`: Directory (within the store) of the per-customer JSON files
//! - `local_root`: Directory used when boards are kept on local disk
//! - `remote`: Coordinates of the hosted repository, for the transport layer
//!
//! # Example
//!
//! ```ignore
//! use taskboard_core::config::Config;
//!
//! let config = Config::load()?;
//! let path = config.board_path("Acme");
//! assert_eq!(path, "data/acme.json");
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{BoardError, Result};

/// Where boards are stored and how to reach them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Branch holding the board files
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Directory of the per-customer board files
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Root directory for the local file store (CLI)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_root: Option<PathBuf>,

    /// Hosted repository the transport layer talks to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteConfig>,
}

/// Coordinates of the hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub owner: String,
    pub repo: String,
    /// Access token; prefer leaving this out and supplying it through the environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            branch: default_branch(),
            data_dir: default_data_dir(),
            local_root: None,
            remote: None,
        }
    }
}

impl Config {
    /// Path of a customer's board file within the store.
    ///
    /// Customer ids are case-insensitive; files are named in lowercase.
    pub fn board_path(&self, customer_id: &str) -> String {
        format!(
            "{}/{}.json",
            self.data_dir.trim_end_matches('/'),
            customer_id.to_lowercase()
        )
    }

    /// Parse config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize config as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load config from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Save config to a specific file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Get the default config file path
    #[cfg(not(target_arch = "wasm32"))]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("taskboard").join("config.toml"))
    }

    /// Load from the default location, falling back to defaults when no file exists.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self> {
        let path = Self::config_path().ok_or(BoardError::NoConfigDir)?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.branch, "main");
        assert_eq!(config.board_path("AcmeCo"), "data/acmeco.json");
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml(
            r#"
            branch = "boards"
            data_dir = "customers/"
            local_root = "/srv/boards"

            [remote]
            owner = "studio"
            repo = "uat-boards"
            "#,
        )
        .unwrap();

        assert_eq!(config.branch, "boards");
        assert_eq!(config.board_path("X"), "customers/x.json");
        assert_eq!(config.local_root, Some(PathBuf::from("/srv/boards")));
        let remote = config.remote.unwrap();
        assert_eq!(remote.repo, "uat-boards");
        assert!(remote.token.is_none());
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("branch = [").unwrap_err();
        assert!(matches!(err, BoardError::ConfigParse(_)));
    }

    #[test]
    fn test_save_and_load() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let config = Config {
            local_root: Some(PathBuf::from("/tmp/boards")),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }
}
