use serde::{Deserialize, Serialize};

/// A 2D surface of `f64` samples, row-major.
/// Dimensions are fixed at construction; values are mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// Row-major sample values.
    pub data: Vec<f64>,
    pub rows: usize,
    pub cols: usize,
}

impl Surface {
    /// Create a new Surface filled with the given value.
    pub fn new(rows: usize, cols: usize, fill: f64) -> Self {
        Self {
            data: vec![fill; rows * cols],
            rows,
            cols,
        }
    }

    /// Create a zeroed square Surface with edge length `size`.
    pub fn square(size: usize) -> Self {
        Self::new(size, size, 0.0)
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, val: f64) {
        self.data[row * self.cols + col] = val;
    }

    /// Values narrowed to `f32`, row-major, for float raster export.
    pub fn to_f32(&self) -> Vec<f32> {
        self.data.iter().map(|&v| v as f32).collect()
    }
}

#[cfg(test)]
impl Surface {
    pub(crate) fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn min_value(&self) -> f64 {
        self.data.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    pub(crate) fn max_value(&self) -> f64 {
        self.data.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }
}
