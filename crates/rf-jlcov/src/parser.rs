//! Coverage.jl annotation parsing
//!
//! Each line of a `.cov` file starts with a marker column: `-` for lines that are not
//! executable, or the number of times the line ran. The rest of the line is the source text.

use crate::{CoverageError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Marker Coverage.jl writes for non-executable lines
pub const NOT_CODE_MARKER: &str = "-";

/// Coverage state of one source line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCoverage {
    /// Comment, blank line or other non-executable code
    NotCode,
    /// Executable line with its execution count
    HitCount(u64),
}

impl LineCoverage {
    /// Parse a single marker token
    pub fn from_marker(token: &str) -> Option<Self> {
        if token == NOT_CODE_MARKER {
            return Some(Self::NotCode);
        }
        token.parse().ok().map(Self::HitCount)
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Self::HitCount(_))
    }

    pub fn is_covered(&self) -> bool {
        matches!(self, Self::HitCount(n) if *n > 0)
    }

    /// Value written to the report; non-code lines render as 0
    pub fn rendered(&self) -> u64 {
        match self {
            Self::NotCode => 0,
            Self::HitCount(n) => *n,
        }
    }
}

impl Serialize for LineCoverage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.rendered())
    }
}

// The rendered form does not distinguish NotCode from zero hits, so reading a
// report back always yields HitCount.
impl<'de> Deserialize<'de> for LineCoverage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        u64::deserialize(deserializer).map(Self::HitCount)
    }
}

/// Parse annotation text; `path` is only used for error reporting
pub fn parse_annotation(path: &Path, content: &str) -> Result<Vec<LineCoverage>> {
    parse_annotation_reader(path, content.as_bytes())
}

/// Read and parse an annotation file
pub fn parse_annotation_file(path: &Path) -> Result<Vec<LineCoverage>> {
    let file = File::open(path).map_err(|e| CoverageError::filesystem(path, e))?;
    let lines = parse_annotation_reader(path, BufReader::new(file))?;

    log::debug!("Parsed {} ({} lines)", path.display(), lines.len());
    Ok(lines)
}

/// Parse annotation lines from any buffered reader.
///
/// Lines are split on raw bytes; only the marker column has to be valid UTF-8.
pub fn parse_annotation_reader<R: BufRead>(path: &Path, reader: R) -> Result<Vec<LineCoverage>> {
    let mut lines = Vec::new();
    for (index, line) in reader.split(b'\n').enumerate() {
        let line = line.map_err(|e| CoverageError::filesystem(path, e))?;
        lines.push(parse_line(path, index, &line)?);
    }
    Ok(lines)
}

fn parse_line(path: &Path, index: usize, line: &[u8]) -> Result<LineCoverage> {
    let token = line
        .split(|b| b.is_ascii_whitespace())
        .find(|t| !t.is_empty())
        .unwrap_or_default();

    std::str::from_utf8(token)
        .ok()
        .and_then(LineCoverage::from_marker)
        .ok_or_else(|| CoverageError::MalformedAnnotation {
            path: path.to_path_buf(),
            line: index,
            token: String::from_utf8_lossy(token).into_owned(),
        })
}
