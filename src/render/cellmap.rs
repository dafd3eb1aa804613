//! Cell map output.
//!
//! Describes where each mode landed on a sheet as JSON, so other tools can
//! slice patterns back out of the image without redoing the layout.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, SheetError};
use crate::layout::GridLayout;
use crate::types::Colour;

/// Write the cell map for a rendered sheet.
///
/// `image` is the file name recorded in the metadata block.
pub fn write_cell_map(
    layout: &GridLayout,
    title: &str,
    palette: &[Colour],
    image: &str,
    path: &Path,
) -> Result<()> {
    let output = CellMapJson::new(layout, title, palette, image);
    let json = serde_json::to_string_pretty(&output).map_err(|e| SheetError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to serialize cell map: {}", e),
    })?;
    fs::write(path, json).map_err(|e| SheetError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write cell map: {}", e),
    })?;
    Ok(())
}

// --- JSON serialization types ---

#[derive(Serialize)]
struct CellMapJson {
    cells: Vec<CellJson>,
    meta: MetaJson,
}

#[derive(Serialize)]
struct CellJson {
    mode: u64,
    row: u32,
    column: u32,
    frame: RectJson,
}

#[derive(Serialize)]
struct RectJson {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct SizeJson {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct MetaJson {
    app: String,
    version: String,
    image: String,
    title: String,
    size: SizeJson,
    #[serde(rename = "cellSize")]
    cell_size: u32,
    palette: Vec<String>,
}

impl CellMapJson {
    fn new(layout: &GridLayout, title: &str, palette: &[Colour], image: &str) -> Self {
        let cells = layout
            .cells
            .iter()
            .map(|c| CellJson {
                mode: c.mode,
                row: c.row,
                column: c.column,
                frame: RectJson {
                    x: c.rect.min_x,
                    y: c.rect.min_y,
                    w: c.rect.width(),
                    h: c.rect.height(),
                },
            })
            .collect();

        CellMapJson {
            cells,
            meta: MetaJson {
                app: "eightbyeight".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                image: image.to_string(),
                title: title.to_string(),
                size: SizeJson {
                    w: layout.width,
                    h: layout.height,
                },
                cell_size: layout.cell_size,
                palette: palette.iter().map(|c| c.to_string()).collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::TextMetrics;
    use tempfile::tempdir;

    #[test]
    fn test_write_cell_map() {
        let metrics = TextMetrics {
            title_width: 10,
            label_width: 10,
            ascent: 8,
            line_height: 10,
        };
        let layout = GridLayout::compute(2, 2, 16, &metrics);

        let dir = tempdir().unwrap();
        let path = dir.path().join("cells.json");
        write_cell_map(
            &layout,
            "Test",
            &[Colour::WHITE, Colour::BLACK],
            "out.bmp",
            &path,
        )
        .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        let cells = json["cells"].as_array().unwrap();
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[3]["mode"], 3);
        assert_eq!(cells[3]["frame"]["x"], 16);
        assert_eq!(cells[3]["frame"]["y"], 36);
        assert_eq!(cells[3]["frame"]["w"], 15);
        assert_eq!(json["meta"]["image"], "out.bmp");
        assert_eq!(json["meta"]["size"]["w"], 32);
        assert_eq!(json["meta"]["cellSize"], 16);
        assert_eq!(json["meta"]["palette"][1], "#000000");
    }
}
