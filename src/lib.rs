//! eightbyeight - Tileable 8x8 dither patterns
//!
//! A library for sampling a procedural family of 8x8 hatch and dither
//! patterns and laying them out as labelled reference sheets.

pub mod bitmap;
pub mod cli;
pub mod config;
pub mod error;
pub mod layout;
pub mod output;
pub mod pattern;
pub mod render;
pub mod sheet;
pub mod types;
pub mod verify;

pub use bitmap::{decode, encode, read_bmp, write_bmp, BitmapError};
pub use config::{FontConfig, SheetConfig};
pub use error::{Result, SheetError};
pub use layout::{CellSpec, GridLayout, Pen, Rect, TextMetrics};
pub use pattern::{PatternSource, Tone};
pub use render::{write_cell_map, write_png, BitmapFace, GridImage, GridRenderer, TextFace};
pub use sheet::{generate, generate_with_layout, save, Sheet};
pub use types::{Colour, Palette};
pub use verify::{parse_modes, verify_image, verify_sheet, Anchor, VerifyReport};
