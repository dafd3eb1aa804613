//! Palette-indexed raster.

use image::{ImageBuffer, Rgba, RgbaImage};

use crate::config::check_canvas;
use crate::error::{Result, SheetError};
use crate::layout::Rect;
use crate::types::Colour;

/// An indexed image: one palette index per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridImage {
    width: u32,
    height: u32,
    palette: Vec<Colour>,
    pixels: Vec<u8>,
}

impl GridImage {
    /// Create an image filled with palette index 0.
    pub fn new(width: u32, height: u32, palette: Vec<Colour>) -> Self {
        Self {
            width,
            height,
            palette,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    /// Get the width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the dimensions as (width, height).
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The colour table.
    pub fn palette(&self) -> &[Colour] {
        &self.palette
    }

    /// All indices, row-major.
    pub fn indices(&self) -> &[u8] {
        &self.pixels
    }

    /// One row of indices.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Get the palette index at a position.
    pub fn index_at(&self, x: u32, y: u32) -> Option<u8> {
        self.offset(x, y).map(|i| self.pixels[i])
    }

    /// Get the colour at a position.
    ///
    /// Indices past the end of the palette read as transparent black.
    pub fn colour_at(&self, x: u32, y: u32) -> Option<Colour> {
        self.index_at(x, y).map(|i| self.colour_of(i))
    }

    fn colour_of(&self, index: u8) -> Colour {
        self.palette
            .get(index as usize)
            .copied()
            .unwrap_or(Colour::new(0, 0, 0, 0))
    }

    /// Set a pixel's palette index. Positions outside the image are ignored.
    pub fn set_index(&mut self, x: u32, y: u32, index: u8) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i] = index;
        }
    }

    /// Set a pixel at signed coordinates, clipping anything off-canvas.
    pub fn put(&mut self, x: i64, y: i64, index: u8) {
        if let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) {
            self.set_index(x, y, index);
        }
    }

    /// Fill a rectangle (clipped to the image) with one index.
    pub fn fill_rect(&mut self, rect: Rect, index: u8) {
        for (x, y) in rect.points() {
            self.set_index(x, y, index);
        }
    }

    /// Copy a rectangle out into a new image with the same palette.
    pub fn crop(&self, rect: Rect) -> GridImage {
        let max_x = rect.max_x.min(self.width);
        let max_y = rect.max_y.min(self.height);
        let rect = Rect::new(rect.min_x.min(max_x), rect.min_y.min(max_y), max_x, max_y);

        let mut out = GridImage::new(rect.width(), rect.height(), self.palette.clone());
        for (x, y) in rect.points() {
            if let Some(i) = self.index_at(x, y) {
                out.set_index(x - rect.min_x, y - rect.min_y, i);
            }
        }
        out
    }

    /// Expand to an RGBA buffer, scaling each pixel up by `scale`.
    ///
    /// Fails with a `Config` error if the scaled canvas is too large.
    pub fn to_rgba_image(&self, scale: u32) -> Result<RgbaImage> {
        let scale = scale.max(1);
        let too_large = || SheetError::Config {
            message: format!(
                "{}x{} sheet cannot be scaled by {}",
                self.width, self.height, scale
            ),
            help: Some("Use a smaller --scale".to_string()),
        };
        let width = self.width.checked_mul(scale).ok_or_else(too_large)?;
        let height = self.height.checked_mul(scale).ok_or_else(too_large)?;
        check_canvas(u64::from(width), u64::from(height)).map_err(|_| too_large())?;

        Ok(ImageBuffer::from_fn(width, height, |x, y| {
            let i = (y / scale) as usize * self.width as usize + (x / scale) as usize;
            Rgba(self.colour_of(self.pixels[i]).to_rgba())
        }))
    }
}
