//! GPX importer.
//!
//! Parses GPX 1.1 documents with `quick-xml` and derives elapsed-time
//! weighted heart-rate samples from consecutive trackpoint deltas. Heart
//! rate is read from the trackpoint extension element with local name `hr`
//! (`gpxtpx:hr`, `ns3:hr`, ...); a point without one carries heart rate 0.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::error::{ImportError, Result};
use crate::import::TrackImport;
use crate::models::{Sample, TrackData};

/// GPX importer for GPS track data
pub struct GpxImporter;

impl GpxImporter {
    pub fn new() -> Self {
        Self
    }
}

impl TrackImport for GpxImporter {
    fn can_import(&self, file_path: &Path) -> bool {
        file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase() == "gpx")
            .unwrap_or(false)
    }

    fn import_file(&self, file_path: &Path) -> Result<TrackData> {
        let contents = fs::read_to_string(file_path).map_err(|e| ImportError::Unreadable {
            path: file_path.to_path_buf(),
            reason: e.to_string(),
        })?;

        parse_gpx(file_path, &contents)
    }

    fn format_name(&self) -> &'static str {
        "GPX"
    }
}

/// Which element's text content is currently being read
enum Capture {
    Time,
    HeartRate,
}

/// Parse a GPX document into track data.
///
/// The track start time is the `<metadata><time>` value, or the first
/// trackpoint's timestamp when the metadata carries none. Each consecutive
/// point pair within a `<trkseg>` yields one sample weighted by the time
/// delta to the next point; the final point of a segment yields none.
/// Out-of-order timestamps clamp to a zero-second delta.
pub fn parse_gpx(path: &Path, contents: &str) -> Result<TrackData> {
    let parse_error = |reason: String| ImportError::Parse {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = Reader::from_str(contents);

    let mut metadata_time: Option<DateTime<Utc>> = None;
    let mut first_point_time: Option<DateTime<Utc>> = None;
    let mut in_metadata = false;
    let mut in_trkpt = false;
    let mut capture: Option<Capture> = None;

    let mut point_time: Option<DateTime<Utc>> = None;
    let mut point_hr: u16 = 0;
    let mut segment: Vec<(Option<DateTime<Utc>>, u16)> = Vec::new();

    let mut point_count = 0usize;
    let mut samples: Vec<Sample> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"metadata" => in_metadata = true,
                b"trkpt" => {
                    in_trkpt = true;
                    point_time = None;
                    point_hr = 0;
                }
                b"time" if in_metadata || in_trkpt => capture = Some(Capture::Time),
                b"hr" if in_trkpt => capture = Some(Capture::HeartRate),
                _ => {}
            },
            Ok(Event::Text(text)) => {
                if let Some(target) = &capture {
                    let value = text
                        .unescape()
                        .map_err(|e| parse_error(e.to_string()))?
                        .trim()
                        .to_string();
                    match target {
                        Capture::Time => {
                            let parsed = DateTime::parse_from_rfc3339(&value)
                                .map_err(|e| {
                                    parse_error(format!("invalid timestamp {value}: {e}"))
                                })?
                                .with_timezone(&Utc);
                            if in_trkpt {
                                point_time = Some(parsed);
                                first_point_time = first_point_time.or(Some(parsed));
                            } else {
                                metadata_time = Some(parsed);
                            }
                        }
                        Capture::HeartRate => {
                            point_hr = value.parse::<u16>().map_err(|_| {
                                parse_error(format!("invalid heart rate value: {value}"))
                            })?;
                        }
                    }
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"metadata" => in_metadata = false,
                b"time" | b"hr" => capture = None,
                b"trkpt" => {
                    in_trkpt = false;
                    point_count += 1;
                    segment.push((point_time, point_hr));
                }
                b"trkseg" => {
                    flush_segment(&segment, &mut samples);
                    segment.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(parse_error(e.to_string()).into()),
            _ => {}
        }
    }

    let start_time =
        metadata_time
            .or(first_point_time)
            .ok_or_else(|| ImportError::MissingTimestamp {
                path: path.to_path_buf(),
            })?;

    let mut track = TrackData::new(start_time);
    track.samples = samples;

    debug!(
        file = %path.display(),
        points = point_count,
        samples = track.samples.len(),
        seconds = track.total_seconds(),
        "parsed GPX track"
    );

    Ok(track)
}

/// Derive samples from consecutive point pairs of one segment; the final
/// point has no successor and contributes nothing.
fn flush_segment(points: &[(Option<DateTime<Utc>>, u16)], samples: &mut Vec<Sample>) {
    for pair in points.windows(2) {
        let (curr_time, heart_rate) = pair[0];
        let (next_time, _) = pair[1];

        let elapsed_seconds = match (curr_time, next_time) {
            (Some(curr), Some(next)) => {
                ((next - curr).num_milliseconds() as f64 / 1000.0).max(0.0)
            }
            _ => 0.0,
        };

        samples.push(Sample::new(heart_rate, elapsed_seconds));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HrZonesError;
    use std::path::PathBuf;

    fn gpx_path() -> PathBuf {
        PathBuf::from("test.gpx")
    }

    const SIMPLE_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="unit-test">
  <metadata><time>2024-01-01T08:00:00Z</time></metadata>
  <trk>
    <trkseg>
      <trkpt lat="47.0" lon="8.0">
        <time>2024-01-01T08:00:00Z</time>
        <extensions><gpxtpx:TrackPointExtension><gpxtpx:hr>120</gpxtpx:hr></gpxtpx:TrackPointExtension></extensions>
      </trkpt>
      <trkpt lat="47.0" lon="8.0">
        <time>2024-01-01T08:00:10Z</time>
        <extensions><gpxtpx:TrackPointExtension><gpxtpx:hr>150</gpxtpx:hr></gpxtpx:TrackPointExtension></extensions>
      </trkpt>
      <trkpt lat="47.0" lon="8.0">
        <time>2024-01-01T08:00:15Z</time>
        <extensions><gpxtpx:TrackPointExtension><gpxtpx:hr>160</gpxtpx:hr></gpxtpx:TrackPointExtension></extensions>
      </trkpt>
    </trkseg>
  </trk>
</gpx>"#;

    #[test]
    fn test_can_import_checks_extension() {
        let importer = GpxImporter::new();
        assert!(importer.can_import(Path::new("ride.gpx")));
        assert!(importer.can_import(Path::new("RIDE.GPX")));
        assert!(!importer.can_import(Path::new("ride.fit")));
        assert!(!importer.can_import(Path::new("gpx")));
    }

    #[test]
    fn test_parse_derives_samples_from_point_deltas() {
        let track = parse_gpx(&gpx_path(), SIMPLE_GPX).unwrap();

        // three points give two samples; the last point has no successor
        assert_eq!(track.samples.len(), 2);
        assert_eq!(track.samples[0], Sample::new(120, 10.0));
        assert_eq!(track.samples[1], Sample::new(150, 5.0));
        assert_eq!(
            track.start_time,
            DateTime::parse_from_rfc3339("2024-01-01T08:00:00Z").unwrap()
        );
    }

    #[test]
    fn test_segments_do_not_bridge() {
        let gpx = r#"<gpx version="1.1">
  <metadata><time>2024-01-01T08:00:00Z</time></metadata>
  <trk>
    <trkseg>
      <trkpt lat="0" lon="0"><time>2024-01-01T08:00:00Z</time><extensions><ns3:hr>110</ns3:hr></extensions></trkpt>
      <trkpt lat="0" lon="0"><time>2024-01-01T08:00:05Z</time><extensions><ns3:hr>112</ns3:hr></extensions></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="0" lon="0"><time>2024-01-01T09:00:00Z</time><extensions><ns3:hr>130</ns3:hr></extensions></trkpt>
      <trkpt lat="0" lon="0"><time>2024-01-01T09:00:07Z</time><extensions><ns3:hr>131</ns3:hr></extensions></trkpt>
    </trkseg>
  </trk>
</gpx>"#;
        let track = parse_gpx(&gpx_path(), gpx).unwrap();

        // one sample per segment; no sample spans the hour gap between them
        assert_eq!(track.samples.len(), 2);
        assert_eq!(track.samples[0], Sample::new(110, 5.0));
        assert_eq!(track.samples[1], Sample::new(130, 7.0));
    }

    #[test]
    fn test_missing_heart_rate_defaults_to_zero() {
        let gpx = r#"<gpx version="1.1">
  <trk><trkseg>
    <trkpt lat="0" lon="0"><time>2024-01-01T08:00:00Z</time></trkpt>
    <trkpt lat="0" lon="0"><time>2024-01-01T08:00:03Z</time></trkpt>
  </trkseg></trk>
</gpx>"#;
        let track = parse_gpx(&gpx_path(), gpx).unwrap();

        assert_eq!(track.samples, vec![Sample::new(0, 3.0)]);
        // no metadata time: start falls back to the first point
        assert_eq!(
            track.start_time,
            DateTime::parse_from_rfc3339("2024-01-01T08:00:00Z").unwrap()
        );
    }

    #[test]
    fn test_duplicate_timestamps_yield_zero_elapsed() {
        let gpx = r#"<gpx version="1.1">
  <trk><trkseg>
    <trkpt lat="0" lon="0"><time>2024-01-01T08:00:00Z</time><extensions><gpxtpx:hr>140</gpxtpx:hr></extensions></trkpt>
    <trkpt lat="0" lon="0"><time>2024-01-01T08:00:00Z</time><extensions><gpxtpx:hr>141</gpxtpx:hr></extensions></trkpt>
  </trkseg></trk>
</gpx>"#;
        let track = parse_gpx(&gpx_path(), gpx).unwrap();
        assert_eq!(track.samples, vec![Sample::new(140, 0.0)]);
    }

    #[test]
    fn test_out_of_order_timestamps_clamp_to_zero() {
        let gpx = r#"<gpx version="1.1">
  <trk><trkseg>
    <trkpt lat="0" lon="0"><time>2024-01-01T08:00:30Z</time><extensions><gpxtpx:hr>140</gpxtpx:hr></extensions></trkpt>
    <trkpt lat="0" lon="0"><time>2024-01-01T08:00:00Z</time><extensions><gpxtpx:hr>141</gpxtpx:hr></extensions></trkpt>
  </trkseg></trk>
</gpx>"#;
        let track = parse_gpx(&gpx_path(), gpx).unwrap();
        assert_eq!(track.samples, vec![Sample::new(140, 0.0)]);
    }

    #[test]
    fn test_malformed_xml_fails() {
        let result = parse_gpx(&gpx_path(), "<gpx><trk><trkseg></trk></gpx>");
        assert!(matches!(
            result,
            Err(HrZonesError::Import(ImportError::Parse { .. }))
        ));
    }

    #[test]
    fn test_invalid_heart_rate_fails() {
        let gpx = r#"<gpx version="1.1">
  <trk><trkseg>
    <trkpt lat="0" lon="0"><time>2024-01-01T08:00:00Z</time><extensions><gpxtpx:hr>fast</gpxtpx:hr></extensions></trkpt>
  </trkseg></trk>
</gpx>"#;
        let result = parse_gpx(&gpx_path(), gpx);
        assert!(matches!(
            result,
            Err(HrZonesError::Import(ImportError::Parse { .. }))
        ));
    }

    #[test]
    fn test_track_without_timestamps_fails() {
        let gpx = r#"<gpx version="1.1"><trk><trkseg>
          <trkpt lat="0" lon="0"><extensions><gpxtpx:hr>120</gpxtpx:hr></extensions></trkpt>
        </trkseg></trk></gpx>"#;
        let result = parse_gpx(&gpx_path(), gpx);
        assert!(matches!(
            result,
            Err(HrZonesError::Import(ImportError::MissingTimestamp { .. }))
        ));
    }
}
