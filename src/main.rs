use std::path::PathBuf;
use std::process;

use clap::Parser;
use colored::Colorize;
use tracing::info;

use hrzones::config::{parse_thresholds, ZoneConfig};
use hrzones::error::{HrZonesError, ImportError};
use hrzones::import::ImportManager;
use hrzones::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use hrzones::{report, GroupAggregator, GroupBy};

/// hrzones - Heart rate zone analysis for GPX tracks
///
/// Buckets time-stamped heart-rate samples from GPX recordings into
/// configurable zones and reports the time-weighted distribution per
/// calendar month or ISO week, plus an aggregate over all inputs.
#[derive(Parser)]
#[command(name = "hrzones")]
#[command(version = "0.1.0")]
#[command(about = "Heart rate zone analysis for GPX tracks", long_about = None)]
struct Cli {
    /// Comma separated list of paths to GPX files
    #[arg(long, value_delimiter = ',', default_value = "default.gpx")]
    files: Vec<PathBuf>,

    /// Directory to search for GPX files (takes precedence over --files)
    #[arg(long, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Comma separated list of heart rate zone thresholds
    #[arg(long, value_name = "LIST")]
    zones: Option<String>,

    /// Group per-period histograms by calendar month or ISO week
    #[arg(long, value_enum)]
    group_by: Option<GroupBy>,

    /// Emit the report as JSON instead of colored text
    #[arg(long)]
    json: bool,

    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig {
        level: LogLevel::from_verbosity(cli.verbose),
        format: LogFormat::Compact,
    };
    if let Err(err) = init_logging(&log_config) {
        eprintln!("failed to initialize logging: {err}");
    }

    if let Err(err) = run(cli) {
        eprintln!("{}", err.user_message().red());
        process::exit(exit_code(&err));
    }
}

fn run(cli: Cli) -> hrzones::Result<()> {
    let mut config = ZoneConfig::load_or_default(cli.config.as_deref())?;
    if let Some(zones) = &cli.zones {
        config.thresholds = parse_thresholds(zones)?;
    }
    if let Some(group_by) = cli.group_by {
        config.group_by = group_by;
    }

    let manager = ImportManager::new();
    let tracks = match &cli.directory {
        Some(dir) => manager.import_directory(dir)?,
        None => manager.import_files(&cli.files)?,
    };
    info!(tracks = tracks.len(), "import complete");

    let mut aggregator = GroupAggregator::new(&config.thresholds);
    for track in &tracks {
        aggregator.add_track(config.group_by, track);
    }

    if cli.json {
        report::print_json(&aggregator)
    } else {
        report::print_report(&aggregator)
    }
}

/// Exit codes distinguish configuration, discovery, read and parse failures.
fn exit_code(err: &HrZonesError) -> i32 {
    match err {
        HrZonesError::Config(_) => 1,
        HrZonesError::Import(ImportError::EmptyDirectory { .. }) => 2,
        HrZonesError::Import(ImportError::Unreadable { .. }) => 3,
        HrZonesError::Import(ImportError::Parse { .. }) => 4,
        _ => 1,
    }
}
