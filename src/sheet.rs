//! Sheet generation and output.

use std::path::Path;

use crate::bitmap::write_bmp;
use crate::config::{check_canvas, SheetConfig};
use crate::error::Result;
use crate::layout::{GridLayout, TextMetrics};
use crate::render::{write_png, BitmapFace, GridImage, GridRenderer, TextFace};

/// A rendered sheet together with the geometry it was drawn from.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub layout: GridLayout,
    pub image: GridImage,
}

/// Render the sheet described by `config`.
pub fn generate(config: &SheetConfig) -> Result<GridImage> {
    Ok(generate_with_layout(config)?.image)
}

/// Render the sheet and keep its layout, e.g. for a cell map.
pub fn generate_with_layout(config: &SheetConfig) -> Result<Sheet> {
    config.validate()?;

    tracing::info!(
        title = %config.title,
        rows = config.rows,
        columns = config.columns,
        "Setting up sheet"
    );

    let face = BitmapFace::for_point_size(config.font.size, config.font.dpi)?;
    let layout = layout_for(config, &face);

    tracing::debug!(
        width = layout.width,
        height = layout.height,
        cell_width = layout.cell_width,
        "Computed layout"
    );
    // Text can widen the canvas past what the cell grid alone implies.
    check_canvas(u64::from(layout.width), u64::from(layout.height))?;

    let image = GridRenderer::new(&face, &config.palette).render(&layout, &config.title);
    tracing::info!("Done");

    Ok(Sheet { layout, image })
}

/// Measure the title and label template with `face` and lay out the grid.
pub fn layout_for<F: TextFace>(config: &SheetConfig, face: &F) -> GridLayout {
    let face_metrics = face.metrics();
    let metrics = TextMetrics {
        title_width: face.measure(&config.title),
        label_width: face.measure(&config.label_template),
        ascent: face_metrics.ascent,
        line_height: face_metrics.line_height,
    };
    GridLayout::compute(config.rows, config.columns, config.cell_size, &metrics)
}

/// Write a sheet, picking the container from the extension.
///
/// `.png` files are written as RGBA PNG scaled by `scale`. Anything else is
/// an indexed BMP at native size.
pub fn save(image: &GridImage, path: &Path, scale: u32) -> Result<()> {
    let is_png = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));

    if is_png {
        write_png(image, path, scale)
    } else {
        if scale > 1 {
            tracing::warn!(scale, "Scaling only applies to PNG output; writing BMP at 1x");
        }
        write_bmp(image, path)
    }
}
