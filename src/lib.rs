// Library interface for the hrzones modules
// This allows integration tests to access the core functionality

pub mod aggregate;
pub mod config;
pub mod error;
pub mod histogram;
pub mod import;
pub mod logging;
pub mod models;
pub mod report;

// Re-export commonly used types for convenience
pub use aggregate::{GroupAggregator, GroupBy};
pub use config::ZoneConfig;
pub use error::{ConfigError, HrZonesError, ImportError, Result};
pub use histogram::{BucketSnapshot, HistogramSnapshot, ZoneHistogram};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use models::{Sample, TrackData};
