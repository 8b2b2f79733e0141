//! Time-weighted heart-rate zone histogram.
//!
//! A histogram owns an ordered set of zone buckets, each defined by an
//! inclusive lower heart-rate threshold, and accumulates elapsed-time
//! weighted observations into them. The first bucket is unbounded below,
//! the last bucket catches everything at or above the highest threshold.

use serde::{Deserialize, Serialize};

/// One heart-rate zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// Inclusive lower bound of this zone; 0 for the lowest bucket
    pub threshold_hr: u16,

    /// Number of samples routed to this zone
    pub count: u64,

    /// Cumulative elapsed time attributed to this zone
    pub total_seconds: f64,
}

impl Bucket {
    fn new(threshold_hr: u16) -> Self {
        Self {
            threshold_hr,
            count: 0,
            total_seconds: 0.0,
        }
    }

    fn add(&mut self, elapsed_seconds: f64) {
        self.count += 1;
        self.total_seconds += elapsed_seconds;
    }
}

/// Heart-rate zone histogram with running aggregate statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneHistogram {
    name: String,
    buckets: Vec<Bucket>,
    max_heart_rate_seen: u16,
    total_seconds: f64,
    total_heart_rate_seconds: f64,
}

impl ZoneHistogram {
    /// Create a histogram with `thresholds.len() + 1` buckets.
    ///
    /// Thresholds must be in ascending order; they are not re-sorted, and a
    /// descending or unsorted list produces incorrect bucketing.
    pub fn new(name: impl Into<String>, thresholds: &[u16]) -> Self {
        let mut buckets = Vec::with_capacity(thresholds.len() + 1);
        buckets.push(Bucket::new(0));
        for &threshold in thresholds {
            buckets.push(Bucket::new(threshold));
        }

        Self {
            name: name.into(),
            buckets,
            max_heart_rate_seen: 0,
            total_seconds: 0.0,
            total_heart_rate_seconds: 0.0,
        }
    }

    /// Record one observation.
    ///
    /// The sample lands in the bucket with the greatest threshold that is
    /// `<=` the heart rate. An `elapsed_seconds` of 0 (duplicate timestamps)
    /// still increments the bucket count but adds no weight.
    pub fn add_sample(&mut self, heart_rate: u16, elapsed_seconds: f64) {
        if heart_rate > self.max_heart_rate_seen {
            self.max_heart_rate_seen = heart_rate;
        }
        self.total_seconds += elapsed_seconds;
        self.total_heart_rate_seconds += f64::from(heart_rate) * elapsed_seconds;

        for i in 0..self.buckets.len() - 1 {
            if heart_rate < self.buckets[i + 1].threshold_hr {
                self.buckets[i].add(elapsed_seconds);
                return;
            }
        }
        let last = self.buckets.len() - 1;
        self.buckets[last].add(elapsed_seconds);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Highest heart rate observed so far; 0 before any sample
    pub fn max_heart_rate(&self) -> u16 {
        self.max_heart_rate_seen
    }

    /// Sum of all sample elapsed times
    pub fn total_seconds(&self) -> f64 {
        self.total_seconds
    }

    /// Time-weighted average heart rate, `None` while no time has been
    /// recorded
    pub fn average_heart_rate(&self) -> Option<f64> {
        if self.total_seconds > 0.0 {
            Some(self.total_heart_rate_seconds / self.total_seconds)
        } else {
            None
        }
    }

    /// Immutable summary of the histogram for rendering or serialization.
    pub fn snapshot(&self) -> HistogramSnapshot {
        let buckets = self
            .buckets
            .iter()
            .map(|bucket| BucketSnapshot {
                threshold_hr: bucket.threshold_hr,
                count: bucket.count,
                total_seconds: bucket.total_seconds,
                percent: if self.total_seconds > 0.0 {
                    Some(100.0 * bucket.total_seconds / self.total_seconds)
                } else {
                    None
                },
                duration: format_duration(bucket.total_seconds),
            })
            .collect();

        HistogramSnapshot {
            name: self.name.clone(),
            buckets,
            max_heart_rate: self.max_heart_rate_seen,
            total_seconds: self.total_seconds,
            average_heart_rate: self.average_heart_rate(),
        }
    }
}

/// Point-in-time view of one bucket, percentages already derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSnapshot {
    pub threshold_hr: u16,
    pub count: u64,
    pub total_seconds: f64,

    /// Share of the histogram's total time, `None` when no time recorded
    pub percent: Option<f64>,

    /// Zone time formatted `H:MM:SS`
    pub duration: String,
}

/// Point-in-time view of a whole histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSnapshot {
    pub name: String,
    pub buckets: Vec<BucketSnapshot>,
    pub max_heart_rate: u16,
    pub total_seconds: f64,
    pub average_heart_rate: Option<f64>,
}

/// Format whole seconds as `H:MM:SS`; fractional seconds truncate.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
