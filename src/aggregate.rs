//! Routing of samples into per-period histograms plus a whole-dataset
//! aggregate.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::histogram::ZoneHistogram;
use crate::models::TrackData;

/// Calendar grouping for per-period histograms
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// One histogram per calendar month
    Month,
    /// One histogram per ISO-8601 week
    Week,
}

impl Default for GroupBy {
    fn default() -> Self {
        GroupBy::Month
    }
}

impl GroupBy {
    /// Derive the group key for a track start time.
    ///
    /// Keys are fixed-width, so lexicographic order is chronological order:
    /// month mode yields `"2024-01"`, week mode `"2024 week 01"`. Week keys
    /// use the ISO week-based year, which near year boundaries can differ
    /// from the calendar year.
    pub fn key_for(&self, time: DateTime<Utc>) -> String {
        match self {
            GroupBy::Month => format!("{}-{:02}", time.year(), time.month()),
            GroupBy::Week => {
                let iso = time.iso_week();
                format!("{} week {:02}", iso.year(), iso.week())
            }
        }
    }
}

/// Owns one histogram per group key plus the aggregate over everything.
///
/// The aggregate is created eagerly; group histograms appear the first time
/// a sample for their key arrives, always with the same thresholds as the
/// aggregate.
#[derive(Debug, Clone)]
pub struct GroupAggregator {
    thresholds: Vec<u16>,
    aggregate: ZoneHistogram,
    groups: BTreeMap<String, ZoneHistogram>,
}

impl GroupAggregator {
    /// Thresholds must be ascending; see [`ZoneHistogram::new`].
    pub fn new(thresholds: &[u16]) -> Self {
        Self {
            thresholds: thresholds.to_vec(),
            aggregate: ZoneHistogram::new("Heart Rate Zone Summary", thresholds),
            groups: BTreeMap::new(),
        }
    }

    /// Route one sample to the aggregate histogram and to its group's
    /// histogram; exactly those two are updated.
    pub fn route_sample(&mut self, group_key: &str, heart_rate: u16, elapsed_seconds: f64) {
        self.aggregate.add_sample(heart_rate, elapsed_seconds);

        if !self.groups.contains_key(group_key) {
            debug!(group = group_key, "creating histogram for new group");
            let histogram = ZoneHistogram::new(
                format!("{} Heart rate zones", group_key),
                &self.thresholds,
            );
            self.groups.insert(group_key.to_string(), histogram);
        }
        if let Some(histogram) = self.groups.get_mut(group_key) {
            histogram.add_sample(heart_rate, elapsed_seconds);
        }
    }

    /// Route every sample of a track under the key derived from its start
    /// time.
    pub fn add_track(&mut self, group_by: GroupBy, track: &TrackData) {
        let key = group_by.key_for(track.start_time);
        debug!(
            group = %key,
            samples = track.samples.len(),
            "routing track samples"
        );
        for sample in &track.samples {
            self.route_sample(&key, sample.heart_rate, sample.elapsed_seconds);
        }
    }

    pub fn aggregate(&self) -> &ZoneHistogram {
        &self.aggregate
    }

    /// Number of histograms held, the aggregate included
    pub fn histogram_count(&self) -> usize {
        self.groups.len() + 1
    }

    /// Histograms to render, in display order.
    ///
    /// With more than two histograms in play the per-group histograms are
    /// yielded in key order and the aggregate is omitted; with fewer, only
    /// the aggregate is yielded.
    pub fn reports(&self) -> Box<dyn Iterator<Item = &ZoneHistogram> + '_> {
        if self.histogram_count() > 2 {
            Box::new(self.groups.values())
        } else {
            Box::new(std::iter::once(&self.aggregate))
        }
    }
}
