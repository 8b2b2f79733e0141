//! Shared data types exchanged between the importer and the zone engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One heart-rate observation weighted by the time until the next
/// recorded point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Heart rate in beats per minute
    pub heart_rate: u16,

    /// Seconds until the next point in the same segment
    pub elapsed_seconds: f64,
}

impl Sample {
    pub fn new(heart_rate: u16, elapsed_seconds: f64) -> Self {
        Self {
            heart_rate,
            elapsed_seconds,
        }
    }
}

/// Samples derived from one recorded track, plus the timestamp used to
/// assign the track to a calendar group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackData {
    /// Recording start time (metadata time, or first point time)
    pub start_time: DateTime<Utc>,

    /// Elapsed-time-weighted samples, in recording order
    pub samples: Vec<Sample>,
}

impl TrackData {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            samples: Vec::new(),
        }
    }

    /// Total recorded seconds across all samples
    pub fn total_seconds(&self) -> f64 {
        self.samples.iter().map(|s| s.elapsed_seconds).sum()
    }
}
