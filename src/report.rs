//! Terminal and JSON rendering of histogram snapshots.
//!
//! Layout per histogram: bold green name, one line per zone with the share
//! of total time and the zone time as `H:MM:SS`, then max and time-weighted
//! average heart rate. Empty histograms print `-` placeholders.

use std::io::Write;

use colored::Colorize;

use crate::aggregate::GroupAggregator;
use crate::error::Result;
use crate::histogram::HistogramSnapshot;

/// Render every histogram selected by the aggregator's display rule to
/// stdout.
pub fn print_report(aggregator: &GroupAggregator) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for histogram in aggregator.reports() {
        write_histogram(&mut out, &histogram.snapshot())?;
    }
    Ok(())
}

/// Write one histogram in the terminal layout.
pub fn write_histogram<W: Write>(out: &mut W, snapshot: &HistogramSnapshot) -> Result<()> {
    writeln!(out, "{}", snapshot.name.green().bold())?;

    for bucket in &snapshot.buckets {
        let percent = bucket
            .percent
            .map(|p| format!("{:.1}%", p))
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "> {} \t {} \t [{}]",
            bucket.threshold_hr, percent, bucket.duration
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Max: {}", snapshot.max_heart_rate)?;
    let average = snapshot
        .average_heart_rate
        .map(|a| format!("{:.0}", a))
        .unwrap_or_else(|| "-".to_string());
    writeln!(out, "Avg: {}", average)?;
    writeln!(out)?;

    Ok(())
}

/// Render the selected histograms as a JSON array of snapshots.
pub fn render_json(aggregator: &GroupAggregator) -> Result<String> {
    let snapshots: Vec<HistogramSnapshot> =
        aggregator.reports().map(|h| h.snapshot()).collect();
    Ok(serde_json::to_string_pretty(&snapshots)?)
}

/// Print the JSON report to stdout.
pub fn print_json(aggregator: &GroupAggregator) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", render_json(aggregator)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::{HistogramSnapshot, ZoneHistogram};

    fn populated_aggregator() -> GroupAggregator {
        let mut aggregator = GroupAggregator::new(&[100, 150]);
        aggregator.route_sample("2024-01", 90, 30.0);
        aggregator.route_sample("2024-01", 120, 60.0);
        aggregator.route_sample("2024-01", 160, 30.0);
        aggregator
    }

    #[test]
    fn test_write_histogram_layout() {
        colored::control::set_override(false);

        let mut histogram = ZoneHistogram::new("2024-01 Heart rate zones", &[150]);
        histogram.add_sample(120, 45.0);
        histogram.add_sample(160, 15.0);

        let mut out = Vec::new();
        write_histogram(&mut out, &histogram.snapshot()).unwrap();
        let rendered = String::from_utf8(out).unwrap();

        assert_eq!(
            rendered,
            "2024-01 Heart rate zones\n\
             > 0 \t 75.0% \t [0:00:45]\n\
             > 150 \t 25.0% \t [0:00:15]\n\
             \n\
             Max: 160\n\
             Avg: 130\n\
             \n"
        );
    }

    #[test]
    fn test_empty_histogram_renders_placeholders() {
        colored::control::set_override(false);

        let histogram = ZoneHistogram::new("Heart Rate Zone Summary", &[150]);
        let mut out = Vec::new();
        write_histogram(&mut out, &histogram.snapshot()).unwrap();
        let rendered = String::from_utf8(out).unwrap();

        assert!(rendered.contains("> 0 \t - \t [0:00:00]"));
        assert!(rendered.contains("Avg: -"));
        assert!(rendered.contains("Max: 0"));
    }

    #[test]
    fn test_render_json_round_trips() {
        let aggregator = populated_aggregator();
        let json = render_json(&aggregator).unwrap();

        let snapshots: Vec<HistogramSnapshot> = serde_json::from_str(&json).unwrap();
        // one group: only the aggregate is selected for display
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].name, "Heart Rate Zone Summary");
        assert_eq!(snapshots[0].buckets.len(), 3);
        assert_eq!(snapshots[0].max_heart_rate, 160);
        assert!((snapshots[0].total_seconds - 120.0).abs() < 1e-9);
    }
}
