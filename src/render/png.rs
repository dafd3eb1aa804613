//! PNG output for rendered sheets.
//!
//! Expands the indexed raster to RGBA with optional integer scaling.

use std::path::Path;

use crate::error::{Result, SheetError};

use super::GridImage;

/// Largest integer scale the CLI accepts for PNG output.
pub const MAX_SCALE: u32 = 64;

/// Write a sheet to a PNG file.
///
/// # Arguments
///
/// * `image` - The rendered sheet to write
/// * `path` - Output file path
/// * `scale` - Integer scale factor (1 = no scaling)
///
/// A scaled canvas past the sheet size limit is a `Config` error and
/// nothing is written.
pub fn write_png(image: &GridImage, path: &Path, scale: u32) -> Result<()> {
    let rgba = image.to_rgba_image(scale)?;

    rgba.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| SheetError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write PNG: {}", e),
        })?;

    Ok(())
}
