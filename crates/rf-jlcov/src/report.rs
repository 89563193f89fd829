//! Coverage report aggregation and serialization

use crate::config::ReportConfig;
use crate::metrics::FileCoverage;
use crate::{CoverageError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Report-level summary block.
///
/// These values are fixed and do not reflect `files`; see [`ReportMetrics::placeholder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetrics {
    pub covered_percent: f64,
    pub covered_strength: f64,
    pub covered_lines: usize,
    pub total_lines: usize,
}

impl ReportMetrics {
    /// Constant metrics emitted by every report.
    ///
    /// Consumers that need real totals should sum the per-file entries.
    pub fn placeholder() -> Self {
        Self {
            covered_percent: 100.0,
            covered_strength: 1.0,
            covered_lines: 5,
            total_lines: 5,
        }
    }
}

impl Default for ReportMetrics {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Aggregate coverage report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Unix seconds at generation time
    pub timestamp: u64,
    pub command_name: String,
    /// Per-file entries in discovery order
    pub files: Vec<FileCoverage>,
    pub metrics: ReportMetrics,
}

impl CoverageReport {
    /// Empty report stamped with the current time
    pub fn new(config: &ReportConfig) -> Self {
        Self::with_timestamp(config, timestamp_now())
    }

    pub fn with_timestamp(config: &ReportConfig, timestamp: u64) -> Self {
        Self {
            timestamp,
            command_name: config.command_name.clone(),
            files: Vec::new(),
            metrics: ReportMetrics::placeholder(),
        }
    }

    /// Append one file entry
    pub fn with_file(mut self, file: FileCoverage) -> Self {
        self.files.push(file);
        self
    }

    /// Load a previously written report
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|e| CoverageError::filesystem(path, e))?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialized document: 2-space indented JSON plus a trailing newline
    pub fn to_json(&self) -> Result<String> {
        let mut document = serde_json::to_string_pretty(self)?;
        document.push('\n');
        Ok(document)
    }

    /// One-line summary computed from the per-file entries
    pub fn summary(&self) -> String {
        let covered: usize = self.files.iter().map(|f| f.covered_lines).sum();
        let total: usize = self.files.iter().map(|f| f.lines_of_code).sum();
        let percent = if total == 0 {
            0.0
        } else {
            covered as f64 / total as f64 * 100.0
        };
        format!(
            "{} files, {}/{} lines covered ({:.1}%)",
            self.files.len(),
            covered,
            total,
            percent
        )
    }
}

/// Write `document` to `output` (truncating it), then the same bytes to `stdout`
pub fn write_document<W: Write>(output: &Path, document: &str, stdout: &mut W) -> Result<()> {
    fs::write(output, document).map_err(|e| CoverageError::filesystem(output, e))?;

    stdout
        .write_all(document.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|e| CoverageError::filesystem("<stdout>", e))?;
    Ok(())
}

fn timestamp_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::LineCoverage::{HitCount, NotCode};
    use tempfile::TempDir;

    fn sample_report() -> CoverageReport {
        let config = ReportConfig::default();
        let a = FileCoverage::new(
            "src/a.jl".into(),
            vec![HitCount(1), HitCount(0), NotCode, HitCount(3)],
        )
        .unwrap();
        let b = FileCoverage::new("src/b.jl".into(), vec![NotCode, HitCount(5)]).unwrap();

        CoverageReport::with_timestamp(&config, 1_700_000_000)
            .with_file(a)
            .with_file(b)
    }

    #[test]
    fn test_with_file_preserves_order() {
        let report = sample_report();
        let names: Vec<_> = report.files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["src/a.jl", "src/b.jl"]);
    }

    #[test]
    fn test_metrics_are_placeholders() {
        let report = sample_report();
        assert_eq!(report.metrics, ReportMetrics::placeholder());
        assert_eq!(report.metrics.covered_lines, 5);
        assert_eq!(report.metrics.total_lines, 5);
        assert_eq!(report.command_name, "Coverage.jl");
    }

    #[test]
    fn test_json_layout() {
        let json = sample_report().to_json().unwrap();

        assert!(json.starts_with(
            "{\n  \"timestamp\": 1700000000,\n  \"command_name\": \"Coverage.jl\","
        ));
        assert!(json.contains("\n    {\n      \"filename\": \"src/a.jl\","));
        assert!(json.contains("\"covered_strength\": 1.0"));
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn test_coverage_renders_not_code_as_zero() {
        let json = sample_report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["files"][0]["coverage"], serde_json::json!([1, 0, 0, 3]));
    }

    #[test]
    fn test_round_trip_keeps_file_values() {
        let report = sample_report();
        let parsed = CoverageReport::from_json(&report.to_json().unwrap()).unwrap();

        assert_eq!(parsed.files.len(), report.files.len());
        let rendered = |f: &FileCoverage| f.coverage.iter().map(|l| l.rendered()).collect::<Vec<_>>();
        for (original, parsed) in report.files.iter().zip(&parsed.files) {
            assert_eq!(parsed.filename, original.filename);
            assert_eq!(rendered(parsed), rendered(original));
            assert_eq!(parsed.covered_lines, original.covered_lines);
            assert_eq!(parsed.lines_of_code, original.lines_of_code);
            assert!((parsed.covered_percent - original.covered_percent).abs() < 1e-12);
        }
    }

    #[test]
    fn test_summary_uses_file_data() {
        assert_eq!(sample_report().summary(), "2 files, 3/4 lines covered (75.0%)");
    }

    #[test]
    fn test_write_document_truncates_and_echoes() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("coverage.json");
        fs::write(&output, "stale contents that are longer than the new document").unwrap();

        let mut stdout = Vec::new();
        write_document(&output, "{}\n", &mut stdout).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), "{}\n");
        assert_eq!(stdout, b"{}\n");
    }

    #[test]
    fn test_write_document_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("coverage").join("coverage.json");

        let mut stdout = Vec::new();
        let err = write_document(&output, "{}\n", &mut stdout).unwrap_err();
        assert!(matches!(err, CoverageError::Filesystem { .. }));
        assert!(stdout.is_empty());
    }
}
