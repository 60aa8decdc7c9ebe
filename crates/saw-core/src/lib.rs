//! Ridge-line step/distance sampling for self-avoiding-walk comparison.
//!
//! Rasters (user-supplied or synthesized noise tiles) are passed to an
//! external ridge extractor; each detected line is reduced to its step count
//! and floored end-to-end distance and streamed as CSV.
pub mod dataset;
pub mod error;
pub mod extractor;
pub mod noise;
pub mod pipeline;
pub mod raster;
pub mod sample;
pub mod sink;
pub mod surface;

pub use dataset::{DataKind, Line, LineDataset, Point};
pub use error::{DatasetError, SawError};
pub use extractor::{ProcessExtractor, RidgeExtractor};
pub use noise::params::{NoiseConfig, NoiseDistribution};
pub use pipeline::{CountPolicy, Mode, Pipeline, RunSummary};
pub use raster::{RasterExporter, TiffExporter};
pub use sample::{Sample, SampleWriter};
pub use sink::OutputSink;
pub use surface::Surface;
