//! CSV output sink: standard output or a file.
use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, SawError};

pub enum OutputSink {
    Stdout(Stdout),
    File { path: PathBuf, writer: BufWriter<File> },
}

impl OutputSink {
    /// Open `path` for writing (truncating), or standard output for `None`.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(OutputSink::Stdout(io::stdout())),
            Some(p) => {
                let file = File::create(p).map_err(|source| SawError::OpenOutput {
                    path: p.to_path_buf(),
                    source,
                })?;
                Ok(OutputSink::File { path: p.to_path_buf(), writer: BufWriter::new(file) })
            }
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            OutputSink::Stdout(_) => None,
            OutputSink::File { path, .. } => Some(path),
        }
    }

    /// Flush and release the sink. For files, pending data is also synced so
    /// late write-back failures surface here.
    pub fn close(self) -> Result<()> {
        match self {
            OutputSink::Stdout(mut out) => out.flush().map_err(SawError::Output),
            OutputSink::File { writer, .. } => {
                let file = writer.into_inner().map_err(|e| SawError::CloseOutput(e.into_error()))?;
                match file.sync_all() {
                    // Character devices and pipes cannot be synced (EINVAL).
                    Err(e) if e.kind() == io::ErrorKind::InvalidInput => Ok(()),
                    r => r.map_err(SawError::CloseOutput),
                }
            }
        }
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputSink::Stdout(out) => out.write(buf),
            OutputSink::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputSink::Stdout(out) => out.flush(),
            OutputSink::File { writer, .. } => writer.flush(),
        }
    }
}
