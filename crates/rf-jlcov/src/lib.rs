//! # rf-jlcov
//!
//! Converts Coverage.jl per-line annotation files into a single JSON coverage report.
//!
//! ## Pipeline
//!
//! - Discover `src/*.jl` files that have a companion `.jl.cov` annotation
//! - Parse each annotation into a per-line coverage sequence
//! - Reduce each sequence to per-file metrics
//! - Serialize the report to `coverage/coverage.json` and stdout
//!
//! ## Usage
//!
//! ```bash
//! # Run the Julia test suite with coverage enabled, then
//! mkdir -p coverage
//! rf-jlcov
//! ```

pub mod config;
pub mod discover;
pub mod metrics;
pub mod parser;
pub mod report;

pub use config::ReportConfig;
pub use discover::{Discovery, SourceFile};
pub use metrics::{FileCoverage, FileMetrics};
pub use parser::LineCoverage;
pub use report::{CoverageReport, ReportMetrics};

use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building a coverage report
#[derive(Error, Debug)]
pub enum CoverageError {
    #[error("Malformed annotation in {path} at line {line}: unexpected marker {token:?}")]
    MalformedAnnotation {
        path: PathBuf,
        line: usize,
        token: String,
    },

    #[error("Cannot compute coverage for {path}: file has no executable lines")]
    DivisionByZeroMetric { path: String },

    #[error("Filesystem error at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoverageError {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoverageError>;

/// Build the report for `config` and write it to the output file and `stdout`.
///
/// Nothing is written unless every annotation parses and every file yields metrics.
pub fn run_with<W: Write>(config: &ReportConfig, stdout: &mut W) -> Result<CoverageReport> {
    log::info!("Collecting coverage from {}", config.source_root().display());

    let discovery = Discovery::scan(config)?;
    let report = discovery
        .sources
        .iter()
        .try_fold(CoverageReport::new(config), |report, source| {
            log::debug!(
                "Reading {} from {}",
                source.source_path.display(),
                source.annotation_path.display()
            );
            let lines = parser::parse_annotation_file(&source.annotation_path)?;
            let file = FileCoverage::new(source.filename.clone(), lines)?;
            Ok::<_, CoverageError>(report.with_file(file))
        })?;

    let document = report.to_json()?;
    report::write_document(&config.output_file(), &document, stdout)?;

    log::info!(
        "Wrote {} to {}",
        report.summary(),
        config.output_file().display()
    );
    Ok(report)
}

/// Build and write the report using the process stdout
pub fn run(config: &ReportConfig) -> Result<CoverageReport> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    run_with(config, &mut handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_file() {
        let err = CoverageError::MalformedAnnotation {
            path: PathBuf::from("src/a.jl.cov"),
            line: 0,
            token: "x".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("src/a.jl.cov"));
        assert!(msg.contains("line 0"));

        let err = CoverageError::DivisionByZeroMetric {
            path: "src/b.jl".into(),
        };
        assert!(err.to_string().contains("src/b.jl"));
    }
}
