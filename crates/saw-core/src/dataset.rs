//! Ridge-line datasets produced by the external extractor.
//!
//! On-disk encoding is a JSON container tagged with its kind:
//!
//! ```json
//! {"kind": "lines", "lines": [[{"row": 1.5, "col": 2.25}, ...], ...]}
//! ```
//!
//! Only the `lines` kind is consumed; any other kind is rejected rather than
//! read as an empty dataset.
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// Dataset kinds the extractor can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Points,
    Lines,
    Segments,
}

/// Sub-pixel image position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub row: f64,
    pub col: f64,
}

impl Point {
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }
}

/// One detected ridge polyline. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    points: Vec<Point>,
}

impl Line {
    /// Returns `None` for an empty point list.
    pub fn new(points: Vec<Point>) -> Option<Self> {
        (!points.is_empty()).then_some(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn point(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    pub fn first(&self) -> &Point {
        &self.points[0]
    }

    pub fn last(&self) -> &Point {
        &self.points[self.points.len() - 1]
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

/// A LINES-kind dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineDataset {
    lines: Vec<Line>,
}

#[derive(Deserialize)]
struct RawDataset {
    kind: DataKind,
    #[serde(default)]
    lines: Vec<Vec<Point>>,
}

impl LineDataset {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }

    /// Parse an in-memory dataset.
    pub fn from_json(text: &str) -> Result<Self, DatasetError> {
        let raw: RawDataset = serde_json::from_str(text)?;
        if raw.kind != DataKind::Lines {
            return Err(DatasetError::WrongKind(raw.kind));
        }
        let lines = raw
            .lines
            .into_iter()
            .enumerate()
            .map(|(index, points)| Line::new(points).ok_or(DatasetError::EmptyLine { index }))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { lines })
    }

    /// Read and parse a dataset file.
    pub fn from_file(path: &Path) -> Result<Self, DatasetError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Encode as a LINES container. Used by stub extractors and tests.
    pub fn to_json(&self) -> String {
        let lines: Vec<&[Point]> = self.lines.iter().map(Line::points).collect();
        serde_json::json!({ "kind": DataKind::Lines, "lines": lines }).to_string()
    }
}

impl<'a> IntoIterator for &'a LineDataset {
    type Item = &'a Line;
    type IntoIter = std::slice::Iter<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
