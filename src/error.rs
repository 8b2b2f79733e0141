//! Unified error hierarchy for hrzones
//!
//! Typed failures are returned to the caller instead of exiting deep inside
//! the library; the binary boundary decides exit codes.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all hrzones operations
#[derive(Debug, Error)]
pub enum HrZonesError {
    /// Configuration errors (zone thresholds, grouping mode, config file)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// GPX import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON report serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configured zone threshold is not an integer
    #[error("Invalid zone threshold: {value}")]
    InvalidThreshold { value: String },

    /// Config file could not be parsed
    #[error("Config file error in {}: {reason}", path.display())]
    FileError { path: PathBuf, reason: String },
}

/// GPX import errors
#[derive(Debug, Error)]
pub enum ImportError {
    /// File not found or unreadable at the specified path
    #[error("Unable to read GPX file {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },

    /// File contents are not valid GPX
    #[error("Unable to parse GPX file {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// No importable files found where some were expected
    #[error("Unable to locate any GPX files in directory: {}", path.display())]
    EmptyDirectory { path: PathBuf },

    /// Track carries no usable timestamp for grouping
    #[error("Missing track timestamp in {}", path.display())]
    MissingTimestamp { path: PathBuf },
}

/// Result type alias for hrzones operations
pub type Result<T> = std::result::Result<T, HrZonesError>;

impl HrZonesError {
    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            HrZonesError::Config(ConfigError::InvalidThreshold { value }) => {
                format!("Unable to create zone {}", value)
            }
            HrZonesError::Import(ImportError::Unreadable { path, .. }) => {
                format!("Could not read track file: {}", path.display())
            }
            HrZonesError::Import(ImportError::Parse { path, .. }) => {
                format!("Track file is not valid GPX: {}", path.display())
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_threshold_message() {
        let err = HrZonesError::Config(ConfigError::InvalidThreshold {
            value: "abc".to_string(),
        });
        assert_eq!(err.user_message(), "Unable to create zone abc");
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_import_error_messages() {
        let err = HrZonesError::Import(ImportError::Parse {
            path: PathBuf::from("ride.gpx"),
            reason: "unexpected end of document".to_string(),
        });
        assert!(err.user_message().contains("ride.gpx"));

        let err = HrZonesError::Import(ImportError::EmptyDirectory {
            path: PathBuf::from("/tmp/tracks"),
        });
        assert!(err.to_string().contains("/tmp/tracks"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: HrZonesError = io.into();
        assert!(matches!(err, HrZonesError::Io(_)));
    }
}
