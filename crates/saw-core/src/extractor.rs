//! Ridge-line extraction capability.
//!
//! The production implementation shells out to an external `ridgetool`
//! binary and blocks until it exits; there is no timeout.
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::debug;

use crate::dataset::LineDataset;
use crate::error::{Result, SawError};

/// Environment variable overriding the extractor program.
pub const PROGRAM_ENV: &str = "RIDGETOOL";

/// Program looked up on `PATH` when [`PROGRAM_ENV`] is unset.
pub const DEFAULT_PROGRAM: &str = "ridgetool";

/// Prefix for temporary files created by this crate.
pub const TEMP_PREFIX: &str = "ridge-saw.";

pub trait RidgeExtractor {
    /// Detect ridge lines in the raster at `input` at detection `scale`.
    fn extract(&self, input: &Path, scale: f64) -> Result<LineDataset>;
}

/// Runs the external extractor as a child process.
#[derive(Debug, Clone)]
pub struct ProcessExtractor {
    program: PathBuf,
}

impl ProcessExtractor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    /// Program from [`PROGRAM_ENV`], falling back to [`DEFAULT_PROGRAM`].
    pub fn from_env() -> Self {
        Self::from_override(env::var_os(PROGRAM_ENV))
    }

    fn from_override(value: Option<OsString>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Self::new(v),
            _ => Self::new(DEFAULT_PROGRAM),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Argument vector after the program name.
    fn args(input: &Path, scale: f64, output: &Path) -> Vec<OsString> {
        vec![
            "-l".into(),
            format!("-t{scale:.6}").into(),
            "-i0".into(),
            input.as_os_str().to_owned(),
            output.as_os_str().to_owned(),
        ]
    }
}

impl Default for ProcessExtractor {
    fn default() -> Self {
        Self::from_env()
    }
}

impl RidgeExtractor for ProcessExtractor {
    fn extract(&self, input: &Path, scale: f64) -> Result<LineDataset> {
        let output = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile()
            .map_err(SawError::TempFile)?;

        let args = Self::args(input, scale, output.path());
        debug!("running {} {:?}", self.program.display(), args);

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| SawError::Spawn { program: self.program.clone(), source })?;

        if !child.status.success() {
            return Err(SawError::ExtractorFailed {
                program: self.program.clone(),
                status: child.status,
                stderr: String::from_utf8_lossy(&child.stderr).into_owned(),
            });
        }

        let dataset = LineDataset::from_file(output.path()).map_err(|source| {
            SawError::DatasetLoad { path: output.path().to_path_buf(), source }
        })?;
        debug!("{} lines from {}", dataset.len(), input.display());

        output.close().map_err(SawError::TempFile)?;
        Ok(dataset)
    }
}
