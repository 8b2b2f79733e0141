use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::error::{ImportError, Result};
use crate::models::TrackData;

pub mod gpx;

/// Trait for importing track data from different file formats
pub trait TrackImport {
    /// Check if this importer can handle the given file
    fn can_import(&self, file_path: &Path) -> bool;

    /// Import track data from the file
    fn import_file(&self, file_path: &Path) -> Result<TrackData>;

    /// Get the format name for this importer
    fn format_name(&self) -> &'static str;
}

/// Manager for coordinating different import formats
pub struct ImportManager {
    importers: Vec<Box<dyn TrackImport>>,
}

impl ImportManager {
    /// Create a new import manager with all available importers
    pub fn new() -> Self {
        let importers: Vec<Box<dyn TrackImport>> = vec![Box::new(gpx::GpxImporter::new())];

        Self { importers }
    }

    /// Import an explicit list of files.
    ///
    /// Files no importer claims (wrong extension) are skipped silently; a
    /// file that is claimed but fails to import aborts the whole run.
    pub fn import_files(&self, paths: &[PathBuf]) -> Result<Vec<TrackData>> {
        let mut tracks = Vec::new();

        for path in paths {
            match self.importers.iter().find(|i| i.can_import(path)) {
                Some(importer) => {
                    debug!(
                        file = %path.display(),
                        format = importer.format_name(),
                        "importing track file"
                    );
                    tracks.push(importer.import_file(path)?);
                }
                None => {
                    debug!(file = %path.display(), "skipping unsupported file");
                }
            }
        }

        Ok(tracks)
    }

    /// Import all supported files from a directory (non-recursive).
    ///
    /// Fails if the directory contains no importable files at all.
    pub fn import_directory(&self, dir_path: &Path) -> Result<Vec<TrackData>> {
        let files = self.collect_importable_files(dir_path)?;

        if files.is_empty() {
            return Err(ImportError::EmptyDirectory {
                path: dir_path.to_path_buf(),
            }
            .into());
        }

        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({msg})",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut tracks = Vec::new();
        for file_path in files {
            pb.set_message(format!(
                "Processing {}",
                file_path.file_name().unwrap_or_default().to_string_lossy()
            ));

            match self.import_files(std::slice::from_ref(&file_path)) {
                Ok(mut imported) => tracks.append(&mut imported),
                Err(e) => {
                    pb.finish_and_clear();
                    return Err(e);
                }
            }

            pb.inc(1);
        }

        pb.finish_with_message("Import complete");
        Ok(tracks)
    }

    /// Collect all files that can be imported from a directory, sorted so
    /// accumulation order is stable across runs
    fn collect_importable_files(&self, dir_path: &Path) -> Result<Vec<PathBuf>> {
        if !dir_path.is_dir() {
            return Err(ImportError::Unreadable {
                path: dir_path.to_path_buf(),
                reason: "not a directory".to_string(),
            }
            .into());
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir_path)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_file() && self.importers.iter().any(|i| i.can_import(&path)) {
                files.push(path);
            }
        }
        files.sort();

        Ok(files)
    }
}

impl Default for ImportManager {
    fn default() -> Self {
        Self::new()
    }
}
