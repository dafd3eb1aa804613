//! Sheet geometry.
//!
//! Places the title line and an R x C grid of pattern cells. Each grid row
//! is a cell followed by a label line; the canvas starts with one extra line
//! for the title. Layout is plain integer arithmetic and never fails.

use serde::Serialize;

/// Label text used to size cell columns when none is configured.
pub const DEFAULT_LABEL_TEMPLATE: &str = "__255__";

/// Upper bound on the cell list's initial capacity.
const MAX_PREALLOCATED_CELLS: usize = 1 << 16;

/// A half-open pixel rectangle: `[min_x, max_x) x [min_y, max_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Rect {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Rect {
    pub fn new(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn width(&self) -> u32 {
        self.max_x.saturating_sub(self.min_x)
    }

    pub fn height(&self) -> u32 {
        self.max_y.saturating_sub(self.min_y)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }

    /// Shrink symmetrically so neither side exceeds `size`.
    ///
    /// When the excess is odd the far edge gives up the extra pixel.
    pub fn centered_within(mut self, size: u32) -> Self {
        let dx = self.width();
        if dx > size {
            let excess = dx - size;
            self.min_x += excess / 2;
            self.max_x -= excess - excess / 2;
        }
        let dy = self.height();
        if dy > size {
            let excess = dy - size;
            self.min_y += excess / 2;
            self.max_y -= excess - excess / 2;
        }
        self
    }

    /// Iterate over every pixel coordinate, row by row.
    pub fn points(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.min_y..self.max_y).flat_map(move |y| (self.min_x..self.max_x).map(move |x| (x, y)))
    }
}

/// A text pen position: left edge and baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Pen {
    pub x: i64,
    pub baseline: i64,
}

/// Text measurements the layout depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextMetrics {
    /// Width of the title string.
    pub title_width: u32,
    /// Width of the label-sizing template.
    pub label_width: u32,
    /// Distance from the top of a line to its baseline.
    pub ascent: u32,
    /// Height of one text line.
    pub line_height: u32,
}

/// One grid position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellSpec {
    pub row: u32,
    pub column: u32,
    pub mode: u64,
    /// Area filled with the pattern.
    pub rect: Rect,
    /// Where the cell's label is drawn.
    #[serde(skip)]
    pub label_pen: Pen,
}

impl CellSpec {
    /// The label drawn under the cell.
    pub fn label(&self) -> String {
        format!("  {}", self.mode)
    }
}

/// Computed geometry for a whole sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    pub width: u32,
    pub height: u32,
    pub cell_size: u32,
    /// Column pitch: the cell size widened to fit the label template.
    pub cell_width: u32,
    pub title_pen: Pen,
    pub cells: Vec<CellSpec>,
}

impl GridLayout {
    /// Lay out `rows` x `columns` cells of nominal `cell_size`.
    pub fn compute(rows: u32, columns: u32, cell_size: u32, metrics: &TextMetrics) -> Self {
        // Geometry saturates at u32::MAX instead of overflowing; oversized
        // sheets are rejected by config validation before they are drawn.
        let line = metrics.line_height;
        let cell_width = cell_size.max(metrics.label_width);
        let row_pitch = line.saturating_add(cell_size);

        let width = metrics
            .title_width
            .max(cell_width.saturating_mul(columns));
        let height = row_pitch.saturating_mul(rows).saturating_add(line);

        let cell_count = usize::try_from(u64::from(rows) * u64::from(columns)).unwrap_or(0);
        let mut cells = Vec::with_capacity(cell_count.min(MAX_PREALLOCATED_CELLS));
        for row in 0..rows {
            let y_top = line.saturating_add(row_pitch.saturating_mul(row));
            let y_bottom = y_top.saturating_add(cell_size);
            for column in 0..columns {
                let x_left = cell_width.saturating_mul(column);
                let raw = Rect::new(
                    x_left,
                    y_top,
                    x_left.saturating_add(cell_width).saturating_sub(1),
                    y_bottom.saturating_sub(1),
                );
                let label_pen = Pen {
                    x: i64::from(x_left),
                    baseline: i64::from(y_bottom) - 1 + i64::from(metrics.ascent),
                };
                cells.push(CellSpec {
                    row,
                    column,
                    mode: mode_for(row, column, columns),
                    rect: raw.centered_within(cell_size),
                    label_pen,
                });
            }
        }

        Self {
            width,
            height,
            cell_size,
            cell_width,
            title_pen: Pen {
                x: 0,
                baseline: i64::from(metrics.ascent),
            },
            cells,
        }
    }

    /// Canvas size as (width, height).
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Find the cell at a grid position.
    pub fn cell(&self, row: u32, column: u32) -> Option<&CellSpec> {
        self.cells
            .iter()
            .find(|c| c.row == row && c.column == column)
    }
}

/// Row-major mode numbering.
pub fn mode_for(row: u32, column: u32, columns: u32) -> u64 {
    u64::from(column) + u64::from(row) * u64::from(columns)
}
