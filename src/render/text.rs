//! Text measurement and drawing.
//!
//! Sheets are labelled with the Spleen bitmap fonts, scaled up by an integer
//! factor. Glyph pixels are either fully on or off.

use std::collections::HashMap;
use std::fmt;

use spleen_font::{PSF2Font, FONT_12X24, FONT_6X12, FONT_8X16};

use crate::error::{Result, SheetError};
use crate::layout::Pen;

use super::GridImage;

/// Largest integer upscale considered when matching a point size.
const MAX_SCALE: u32 = 8;

/// Line metrics of a face, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceMetrics {
    /// Distance from the top of a line to the baseline.
    pub ascent: u32,
    /// Distance between consecutive baselines.
    pub line_height: u32,
}

/// Something that can size and draw a string onto a sheet.
pub trait TextFace {
    /// Advance width of `text`.
    fn measure(&self, text: &str) -> u32;

    /// Line metrics.
    fn metrics(&self) -> FaceMetrics;

    /// Draw `text` with its baseline at `pen`, painting `index`.
    fn draw_string(&self, dst: &mut GridImage, index: u8, pen: Pen, text: &str);
}

/// The built-in Spleen glyph sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyphs {
    Spleen6x12,
    Spleen8x16,
    Spleen12x24,
}

impl Glyphs {
    /// All glyph sets, largest first.
    pub const ALL: [Glyphs; 3] = [Glyphs::Spleen12x24, Glyphs::Spleen8x16, Glyphs::Spleen6x12];

    /// Glyph cell size as (width, height).
    pub fn cell(self) -> (u32, u32) {
        match self {
            Glyphs::Spleen6x12 => (6, 12),
            Glyphs::Spleen8x16 => (8, 16),
            Glyphs::Spleen12x24 => (12, 24),
        }
    }

    /// Rows from the top of the cell down to the baseline.
    fn ascent(self) -> u32 {
        match self {
            Glyphs::Spleen6x12 => 10,
            Glyphs::Spleen8x16 => 13,
            Glyphs::Spleen12x24 => 19,
        }
    }

    fn data(self) -> &'static [u8] {
        match self {
            Glyphs::Spleen6x12 => FONT_6X12,
            Glyphs::Spleen8x16 => FONT_8X16,
            Glyphs::Spleen12x24 => FONT_12X24,
        }
    }
}

impl fmt::Display for Glyphs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.cell();
        write!(f, "spleen-{}x{}", w, h)
    }
}

/// Pick the glyph set and scale whose pixel height is closest to `size`
/// points at `dpi`. Ties go to the larger glyph set.
pub fn choose_face(size: f32, dpi: f32) -> (Glyphs, u32) {
    let target = size * dpi / 72.0;
    let mut best = (Glyphs::Spleen6x12, 1);
    let mut best_diff = f32::INFINITY;

    for glyphs in Glyphs::ALL {
        let (_, h) = glyphs.cell();
        for scale in 1..=MAX_SCALE {
            let diff = ((h * scale) as f32 - target).abs();
            if diff < best_diff {
                best = (glyphs, scale);
                best_diff = diff;
            }
        }
    }

    best
}

/// A Spleen face rasterized once into per-character bitmaps.
#[derive(Debug, Clone)]
pub struct BitmapFace {
    glyphs: Glyphs,
    scale: u32,
    bitmaps: HashMap<char, Vec<bool>>,
}

impl BitmapFace {
    /// Load a glyph set at an integer scale.
    pub fn load(glyphs: Glyphs, scale: u32) -> Result<Self> {
        let mut font = PSF2Font::new(glyphs.data()).map_err(|_| SheetError::FontLoad {
            face: glyphs.to_string(),
        })?;

        let (w, h) = glyphs.cell();
        let (w, h) = (w as usize, h as usize);
        let mut bitmaps = HashMap::new();

        for ch in ' '..='~' {
            let utf8 = ch.to_string();
            if let Some(glyph) = font.glyph_for_utf8(utf8.as_bytes()) {
                let mut bits = vec![false; w * h];
                for (row_y, row) in glyph.enumerate() {
                    for (col_x, on) in row.enumerate() {
                        if row_y < h && col_x < w {
                            bits[row_y * w + col_x] = on;
                        }
                    }
                }
                bitmaps.insert(ch, bits);
            }
        }

        tracing::debug!(face = %glyphs, scale, glyphs = bitmaps.len(), "Loaded font face");

        Ok(Self {
            glyphs,
            scale: scale.max(1),
            bitmaps,
        })
    }

    /// Load the face closest to `size` points at `dpi`.
    pub fn for_point_size(size: f32, dpi: f32) -> Result<Self> {
        let (glyphs, scale) = choose_face(size, dpi);
        Self::load(glyphs, scale)
    }

    pub fn glyphs(&self) -> Glyphs {
        self.glyphs
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    fn advance(&self) -> u32 {
        self.glyphs.cell().0 * self.scale
    }

    fn draw_glyph(&self, dst: &mut GridImage, index: u8, left: i64, top: i64, ch: char) {
        let (w, h) = self.glyphs.cell();
        let s = i64::from(self.scale);

        match self.bitmaps.get(&ch) {
            Some(bits) => {
                for gy in 0..h {
                    for gx in 0..w {
                        if !bits[(gy * w + gx) as usize] {
                            continue;
                        }
                        let x0 = left + i64::from(gx) * s;
                        let y0 = top + i64::from(gy) * s;
                        for dy in 0..s {
                            for dx in 0..s {
                                dst.put(x0 + dx, y0 + dy, index);
                            }
                        }
                    }
                }
            }
            None => {
                // Hollow box for characters the face does not cover.
                let right = left + i64::from(w) * s - 1;
                let bottom = top + i64::from(h) * s - 1;
                for x in left..=right {
                    dst.put(x, top, index);
                    dst.put(x, bottom, index);
                }
                for y in top..=bottom {
                    dst.put(left, y, index);
                    dst.put(right, y, index);
                }
            }
        }
    }
}

impl TextFace for BitmapFace {
    fn measure(&self, text: &str) -> u32 {
        let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        chars.saturating_mul(self.advance())
    }

    fn metrics(&self) -> FaceMetrics {
        let (_, h) = self.glyphs.cell();
        let ascent = self.glyphs.ascent();
        let descent = h - ascent;
        FaceMetrics {
            ascent: ascent * self.scale,
            line_height: (h + descent) * self.scale,
        }
    }

    fn draw_string(&self, dst: &mut GridImage, index: u8, pen: Pen, text: &str) {
        let top = pen.baseline - i64::from(self.metrics().ascent);
        let mut left = pen.x;
        for ch in text.chars() {
            if ch != ' ' {
                self.draw_glyph(dst, index, left, top, ch);
            }
            left += i64::from(self.advance());
        }
    }
}
