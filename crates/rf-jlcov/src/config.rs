//! Configuration for report generation

use std::path::{Path, PathBuf};

/// Label written to `command_name` in every report
pub const COMMAND_NAME: &str = "Coverage.jl";

/// Paths and labels used by one report run
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Directory all other paths are relative to
    pub root: PathBuf,

    /// Directory holding the source files, relative to `root`
    pub source_dir: String,

    /// Source file extension, including the dot
    pub extension: String,

    /// Suffix appended to a source path to locate its annotation file
    pub annotation_suffix: String,

    /// Report destination, relative to `root`
    pub output_path: PathBuf,

    /// Value of `command_name` in the report
    pub command_name: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            source_dir: "src".into(),
            extension: ".jl".into(),
            annotation_suffix: ".cov".into(),
            output_path: PathBuf::from("coverage").join("coverage.json"),
            command_name: COMMAND_NAME.into(),
        }
    }
}

impl ReportConfig {
    /// Builder pattern: set the working root
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Absolute-or-root-relative source directory
    pub fn source_root(&self) -> PathBuf {
        self.root.join(&self.source_dir)
    }

    /// Absolute-or-root-relative output file
    pub fn output_file(&self) -> PathBuf {
        self.root.join(&self.output_path)
    }

    /// Whether `name` is a source file name this run recognizes
    pub fn is_source_name(&self, name: &str) -> bool {
        name.ends_with(&self.extension)
    }

    /// Report-facing name of a source file, e.g. `src/a.jl`
    pub fn report_filename(&self, name: &str) -> String {
        format!("{}/{}", self.source_dir, name)
    }

    /// Companion annotation path for a source file path
    pub fn annotation_path(&self, source: &Path) -> PathBuf {
        let mut path = source.as_os_str().to_owned();
        path.push(&self.annotation_suffix);
        PathBuf::from(path)
    }
}
