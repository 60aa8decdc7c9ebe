//! Error taxonomy. Every variant is terminal: the run stops and the process
//! exits with [`SawError::exit_code`].
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::dataset::DataKind;

/// Failure to turn an extractor output file into a [`crate::dataset::LineDataset`].
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("malformed line data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("expected line data, found {0:?} data")]
    WrongKind(DataKind),

    #[error("line {index} has no points")]
    EmptyLine { index: usize },
}

#[derive(Debug, Error)]
pub enum SawError {
    #[error("{0}")]
    Usage(String),

    #[error("Failed to create temporary file: {0}")]
    TempFile(#[source] io::Error),

    #[error("Failed to load ridge data from '{}': {source}", path.display())]
    DatasetLoad {
        path: PathBuf,
        #[source]
        source: DatasetError,
    },

    #[error("Failed to run '{}': {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{}' failed ({status}):\n{stderr}", program.display())]
    ExtractorFailed {
        program: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Failed to open output file '{}': {source}", path.display())]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Output failed: {0}")]
    Output(#[source] io::Error),

    #[error("Failed to close output file: {0}")]
    CloseOutput(#[source] io::Error),

    #[error("Failed to create temporary image file: {0}")]
    ScratchFile(#[source] io::Error),

    #[error("Failed to write image data to '{}': {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: tiff::TiffError,
    },
}

impl SawError {
    /// Process exit status for this failure category.
    pub fn exit_code(&self) -> i32 {
        match self {
            SawError::Usage(_) => 1,
            SawError::TempFile(_) | SawError::DatasetLoad { .. } => 2,
            SawError::Spawn { .. } | SawError::ExtractorFailed { .. } => 3,
            SawError::OpenOutput { .. } | SawError::Output(_) | SawError::CloseOutput(_) => 4,
            SawError::ScratchFile(_) | SawError::Export { .. } => 5,
        }
    }
}

pub type Result<T, E = SawError> = std::result::Result<T, E>;
