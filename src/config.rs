//! Zone and grouping configuration.
//!
//! Thresholds arrive as a comma separated string (CLI flag) or a TOML file;
//! both are validated here, before any histogram is constructed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::aggregate::GroupBy;
use crate::error::{ConfigError, Result};

/// Default zone threshold when none are configured
pub const DEFAULT_THRESHOLD: u16 = 150;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Zone thresholds in ascending order
    pub thresholds: Vec<u16>,

    /// Calendar grouping for per-period histograms
    pub group_by: GroupBy,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            thresholds: vec![DEFAULT_THRESHOLD],
            group_by: GroupBy::default(),
        }
    }
}

impl ZoneConfig {
    /// Default config file location, `<user config dir>/hrzones/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hrzones").join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::FileError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config = toml::from_str(&contents).map_err(|e| ConfigError::FileError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(config)
    }

    /// Load from an explicit path (must exist), from the default location
    /// when present, or fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }
}

/// Parse a comma separated threshold list such as `"100,150,180"`.
///
/// Any entry that is not an integer fails with
/// [`ConfigError::InvalidThreshold`] naming the entry. Ordering is not
/// checked; ascending order is a precondition on the histograms.
pub fn parse_thresholds(list: &str) -> Result<Vec<u16>> {
    list.split(',')
        .map(|entry| {
            let entry = entry.trim();
            entry.parse::<u16>().map_err(|_| {
                ConfigError::InvalidThreshold {
                    value: entry.to_string(),
                }
                .into()
            })
        })
        .collect()
}
