//! Core domain types for eightbyeight.
//!
//! - `Colour` - RGBA colour values
//! - `Palette` - ordered colour lists with background/foreground fallbacks

mod colour;
mod palette;

pub use colour::Colour;
pub use palette::{Palette, MAX_PALETTE_LEN, PRESET_NAMES};
