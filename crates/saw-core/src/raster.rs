//! Surface → raster file export.
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tiff::encoder::{colortype, TiffEncoder};
use tiff::TiffError;

use crate::error::{Result, SawError};
use crate::surface::Surface;

/// Persists a surface so the extractor can read it back.
pub trait RasterExporter {
    fn export(&self, surface: &Surface, path: &Path) -> Result<()>;
}

/// Single-channel 32-bit IEEE float TIFF. Values are narrowed from `f64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiffExporter;

impl TiffExporter {
    fn write(surface: &Surface, path: &Path) -> std::result::Result<(), TiffError> {
        let width = u32::try_from(surface.cols).map_err(|_| TiffError::LimitsExceeded)?;
        let height = u32::try_from(surface.rows).map_err(|_| TiffError::LimitsExceeded)?;
        let file = File::create(path)?;
        let mut encoder = TiffEncoder::new(BufWriter::new(file))?;
        encoder.write_image::<colortype::Gray32Float>(width, height, &surface.to_f32())?;
        Ok(())
    }
}

impl RasterExporter for TiffExporter {
    fn export(&self, surface: &Surface, path: &Path) -> Result<()> {
        Self::write(surface, path).map_err(|source| SawError::Export {
            path: path.to_path_buf(),
            source,
        })
    }
}
