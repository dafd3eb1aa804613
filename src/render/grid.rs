//! Grid renderer - paints a laid-out sheet of patterns.
//!
//! The canvas palette is the configured palette padded to at least two
//! entries, so index 0 and 1 always hold the colours a pattern would
//! report for background and foreground.

use crate::layout::GridLayout;
use crate::pattern::{PatternSource, Tone};
use crate::types::Palette;

use super::text::TextFace;
use super::GridImage;

/// Renders sheets with a given face and palette.
pub struct GridRenderer<'a, F: TextFace> {
    face: &'a F,
    palette: &'a Palette,
}

impl<'a, F: TextFace> GridRenderer<'a, F> {
    pub fn new(face: &'a F, palette: &'a Palette) -> Self {
        Self { face, palette }
    }

    /// Render the title and every cell of `layout`.
    pub fn render(&self, layout: &GridLayout, title: &str) -> GridImage {
        let colours = self.palette.padded();
        let ink = Tone::Foreground.index();
        let mut image = GridImage::new(layout.width, layout.height, colours);

        tracing::info!(title, "Adding header");
        self.face.draw_string(&mut image, ink, layout.title_pen, title);

        tracing::info!(cells = layout.cells.len(), "Drawing grid with labels");
        for cell in &layout.cells {
            self.face
                .draw_string(&mut image, ink, cell.label_pen, &cell.label());

            let source = PatternSource::new(cell.mode, self.palette.colours());
            // Pattern tiles are anchored to the image origin, not the cell.
            for (x, y) in cell.rect.points() {
                image.set_index(x, y, source.index_at(i64::from(x), i64::from(y)));
            }
            tracing::trace!(mode = cell.mode, row = cell.row, column = cell.column, "Filled cell");
        }

        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Pen, TextMetrics};
    use crate::render::text::FaceMetrics;
    use crate::types::Colour;

    /// A face that measures every character as 5px and draws a solid bar.
    struct BarFace;

    impl TextFace for BarFace {
        fn measure(&self, text: &str) -> u32 {
            text.chars().count() as u32 * 5
        }

        fn metrics(&self) -> FaceMetrics {
            FaceMetrics {
                ascent: 4,
                line_height: 6,
            }
        }

        fn draw_string(&self, dst: &mut GridImage, index: u8, pen: Pen, text: &str) {
            for x in 0..self.measure(text.trim_start()) as i64 {
                dst.put(pen.x + x, pen.baseline - 1, index);
            }
        }
    }

    fn layout(rows: u32, columns: u32, cell: u32) -> GridLayout {
        let metrics = TextMetrics {
            title_width: 20,
            label_width: 15,
            ascent: 4,
            line_height: 6,
        };
        GridLayout::compute(rows, columns, cell, &metrics)
    }

    #[test]
    fn test_cells_hold_patterns_at_absolute_coordinates() {
        let palette = Palette::default();
        let layout = layout(3, 3, 24);
        let image = GridRenderer::new(&BarFace, &palette).render(&layout, "t");

        for cell in &layout.cells {
            let source = PatternSource::new(cell.mode, palette.colours());
            for (x, y) in cell.rect.points() {
                assert_eq!(
                    image.index_at(x, y),
                    Some(source.index_at(x as i64, y as i64)),
                    "mode {} at ({}, {})",
                    cell.mode,
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_canvas_matches_layout_and_palette() {
        let palette = Palette::preset("terminal").unwrap();
        let layout = layout(2, 2, 16);
        let image = GridRenderer::new(&BarFace, &palette).render(&layout, "title");

        assert_eq!(image.size(), layout.size());
        assert_eq!(image.palette(), palette.colours());
        // Gutter pixels outside every cell stay background.
        assert_eq!(image.index_at(layout.width - 1, layout.height - 1), Some(0));
    }

    #[test]
    fn test_short_palette_is_padded() {
        let palette = Palette::new(vec![Colour::rgb(1, 2, 3)]);
        let image = GridRenderer::new(&BarFace, &palette).render(&layout(1, 1, 8), "");
        assert_eq!(image.palette(), &[Colour::rgb(1, 2, 3), Colour::BLACK]);

        let empty = Palette::new(vec![]);
        let image = GridRenderer::new(&BarFace, &empty).render(&layout(1, 1, 8), "");
        assert_eq!(image.palette(), &[Colour::WHITE, Colour::BLACK]);
    }

    #[test]
    fn test_title_and_labels_use_foreground() {
        let palette = Palette::default();
        let layout = layout(1, 2, 16);
        let image = GridRenderer::new(&BarFace, &palette).render(&layout, "abc");

        // Title bar on the row above its baseline.
        assert_eq!(image.index_at(0, 3), Some(1));
        assert_eq!(image.index_at(14, 3), Some(1));
        assert_eq!(image.index_at(15, 3), Some(0));

        // Label bar for the second cell.
        let cell = layout.cell(0, 1).unwrap();
        let y = (cell.label_pen.baseline - 1) as u32;
        assert_eq!(image.index_at(cell.label_pen.x as u32, y), Some(1));
    }

    #[test]
    fn test_empty_grid_draws_title_only() {
        let palette = Palette::default();
        let layout = layout(0, 0, 16);
        let image = GridRenderer::new(&BarFace, &palette).render(&layout, "abcd");
        assert_eq!(image.size(), (20, 6));
        assert_eq!(image.indices().iter().filter(|&&i| i == 1).count(), 20);
    }
}
