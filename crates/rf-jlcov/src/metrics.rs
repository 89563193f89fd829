//! Per-file coverage metrics

use crate::parser::LineCoverage;
use crate::{CoverageError, Result};
use serde::{Deserialize, Serialize};

/// Placeholder weight reported for every file
pub const COVERED_STRENGTH: f64 = 1.0;

/// Summary statistics for one line sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileMetrics {
    /// Executable lines
    pub lines_of_code: usize,
    /// Executable lines that ran at least once
    pub covered_lines: usize,
    /// covered_lines / lines_of_code * 100
    pub covered_percent: f64,
}

impl FileMetrics {
    /// Reduce a line sequence; fails if no line is executable
    pub fn calculate(filename: &str, lines: &[LineCoverage]) -> Result<Self> {
        let lines_of_code = lines.iter().filter(|l| l.is_code()).count();
        let covered_lines = lines.iter().filter(|l| l.is_covered()).count();

        if lines_of_code == 0 {
            return Err(CoverageError::DivisionByZeroMetric {
                path: filename.to_string(),
            });
        }

        Ok(Self {
            lines_of_code,
            covered_lines,
            covered_percent: covered_lines as f64 / lines_of_code as f64 * 100.0,
        })
    }
}

/// Coverage entry for a single source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCoverage {
    /// Source path (`src/a.jl`)
    pub filename: String,
    /// One entry per source line
    pub coverage: Vec<LineCoverage>,
    pub covered_lines: usize,
    pub lines_of_code: usize,
    pub covered_percent: f64,
    /// Always [`COVERED_STRENGTH`]
    #[serde(alias = "covered_strenght")]
    pub covered_strength: f64,
}

impl FileCoverage {
    pub fn new(filename: String, coverage: Vec<LineCoverage>) -> Result<Self> {
        let metrics = FileMetrics::calculate(&filename, &coverage)?;
        Ok(Self {
            filename,
            coverage,
            covered_lines: metrics.covered_lines,
            lines_of_code: metrics.lines_of_code,
            covered_percent: metrics.covered_percent,
            covered_strength: COVERED_STRENGTH,
        })
    }

    /// Lines marked as not executable
    pub fn non_code_lines(&self) -> usize {
        self.coverage.len() - self.lines_of_code
    }

    /// Executable lines that never ran (1-based line numbers)
    pub fn uncovered_lines(&self) -> Vec<usize> {
        self.coverage
            .iter()
            .enumerate()
            .filter(|(_, line)| **line == LineCoverage::HitCount(0))
            .map(|(index, _)| index + 1)
            .collect()
    }
}
