//! Rendering module for eightbyeight.
//!
//! This module turns a computed layout into an indexed raster, draws text
//! with the bitmap face, and writes PNG and cell-map outputs.

mod cellmap;
mod grid;
mod png;
mod raster;
pub mod text;

pub use cellmap::write_cell_map;
pub use grid::GridRenderer;
pub use png::{write_png, MAX_SCALE};
pub use raster::GridImage;
pub use text::{BitmapFace, FaceMetrics, Glyphs, TextFace};
