//! Per-line reduction to `(steps, distance)` and CSV streaming.
use std::fmt;
use std::io::Write;

use crate::dataset::{Line, LineDataset};
use crate::error::{Result, SawError};

/// Step count and end-to-end distance of one ridge line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub steps: usize,
    pub distance: f64,
}

impl Sample {
    /// `steps = len − 1`; distance between the first and last points after
    /// flooring each coordinate to its pixel.
    pub fn from_line(line: &Line) -> Self {
        let start = line.first();
        let end = line.last();
        let dx = end.col.floor() - start.col.floor();
        let dy = end.row.floor() - start.row.floor();
        Self {
            steps: line.len() - 1,
            distance: (dx * dx + dy * dy).sqrt(),
        }
    }
}

/// CSV record body, `"<steps>, <distance>"` with six decimals.
impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {:.6}", self.steps, self.distance)
    }
}

/// Streams samples to a sink in dataset order.
pub struct SampleWriter<W: Write> {
    sink: W,
    written: usize,
}

impl<W: Write> SampleWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, written: 0 }
    }

    /// Total records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn write_sample(&mut self, sample: &Sample) -> Result<()> {
        writeln!(self.sink, "{sample}").map_err(SawError::Output)?;
        self.written += 1;
        Ok(())
    }

    /// Reduce and emit every line of `dataset`, then flush.
    /// Returns the number of records written.
    pub fn write_dataset(&mut self, dataset: &LineDataset) -> Result<usize> {
        for line in dataset {
            self.write_sample(&Sample::from_line(line))?;
        }
        self.sink.flush().map_err(SawError::Output)?;
        Ok(dataset.len())
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
