//! Source file discovery

use crate::config::ReportConfig;
use crate::{CoverageError, Result};
use std::fs;
use std::io;
use std::path::PathBuf;
use walkdir::WalkDir;

/// A source file paired with its annotation file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Name as written to the report (`src/a.jl`)
    pub filename: String,
    /// Location of the source file on disk
    pub source_path: PathBuf,
    /// Location of the companion `.cov` file
    pub annotation_path: PathBuf,
}

/// Result of scanning the source directory
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Sources with an annotation file, in directory-listing order
    pub sources: Vec<SourceFile>,
    /// Sources left out because no annotation file exists
    pub skipped: Vec<PathBuf>,
}

impl Discovery {
    /// Scan the configured source directory.
    ///
    /// Entries are visited in whatever order the filesystem lists them; nothing is sorted.
    pub fn scan(config: &ReportConfig) -> Result<Self> {
        let source_root = config.source_root();
        let metadata =
            fs::metadata(&source_root).map_err(|e| CoverageError::filesystem(&source_root, e))?;
        if !metadata.is_dir() {
            return Err(CoverageError::filesystem(
                &source_root,
                io::Error::new(io::ErrorKind::NotADirectory, "source path is not a directory"),
            ));
        }

        let mut discovery = Discovery::default();

        for entry in WalkDir::new(&source_root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e.path().map(PathBuf::from).unwrap_or_else(|| source_root.clone());
                CoverageError::filesystem(path, e.into())
            })?;

            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if !config.is_source_name(name) {
                continue;
            }

            let source_path = entry.path().to_path_buf();
            let annotation_path = config.annotation_path(&source_path);
            if !annotation_path.is_file() {
                log::debug!(
                    "Skipping {}: no annotation file at {}",
                    source_path.display(),
                    annotation_path.display()
                );
                discovery.skipped.push(source_path);
                continue;
            }

            discovery.sources.push(SourceFile {
                filename: config.report_filename(name),
                source_path,
                annotation_path,
            });
        }

        Ok(discovery)
    }
}
