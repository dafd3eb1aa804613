//! Procedural 8x8 hatch patterns.
//!
//! A pattern is selected by an integer mode. The low base-4 digits of the
//! mode pick a diagonal stride for each of the four column classes, and the
//! mode itself gates which of the eight tile columns may carry ink at all.
//! Every pattern tiles on an 8 pixel grid anchored at the image origin.

use crate::types::Colour;

/// Width and height of one pattern tile in pixels.
pub const TILE_SIZE: i64 = 8;

/// Stride digits used when the mode has no base-4 digits (mode 0).
const DEFAULT_SOUTH: [u8; 4] = [1, 0, 0, 0];

/// Which side of the pattern a pixel falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Background,
    Foreground,
}

impl Tone {
    /// Palette index for this tone: 0 for background, 1 for foreground.
    pub fn index(self) -> u8 {
        match self {
            Tone::Background => 0,
            Tone::Foreground => 1,
        }
    }
}

/// A pattern instance: one mode bound to a palette.
#[derive(Debug, Clone, Copy)]
pub struct PatternSource<'a> {
    mode: u64,
    south: [u8; 4],
    palette: &'a [Colour],
}

impl<'a> PatternSource<'a> {
    /// Bind `mode` to `palette`, precomputing the stride digits.
    pub fn new(mode: u64, palette: &'a [Colour]) -> Self {
        Self {
            mode,
            south: south_digits(mode),
            palette,
        }
    }

    /// The mode this pattern was built from.
    pub fn mode(&self) -> u64 {
        self.mode
    }

    /// The per-column-class stride digits (each 0..=3).
    pub fn south(&self) -> [u8; 4] {
        self.south
    }

    /// Classify the pixel at absolute coordinates `(x, y)`.
    pub fn tone_at(&self, x: i64, y: i64) -> Tone {
        let xp = x.rem_euclid(TILE_SIZE);
        let dp = (y.rem_euclid(TILE_SIZE) + TILE_SIZE - xp) % TILE_SIZE;

        // xp is in 0..8, so the cast cannot truncate.
        if self.mode < xp as u64 {
            return Tone::Background;
        }

        let digit = self.south[(xp % 4) as usize];
        let stride = stride_for(digit);
        if stride > 0 && dp % stride == 0 {
            Tone::Foreground
        } else {
            Tone::Background
        }
    }

    /// Whether `(x, y)` is painted with the foreground colour.
    pub fn is_foreground(&self, x: i64, y: i64) -> bool {
        self.tone_at(x, y) == Tone::Foreground
    }

    /// Palette index for `(x, y)`: 0 for background, 1 for foreground.
    pub fn index_at(&self, x: i64, y: i64) -> u8 {
        self.tone_at(x, y).index()
    }

    /// Colour for `(x, y)`, falling back to white/black when the palette is short.
    pub fn at(&self, x: i64, y: i64) -> Colour {
        match self.tone_at(x, y) {
            Tone::Foreground => self.palette.get(1).copied().unwrap_or(Colour::BLACK),
            Tone::Background => self.palette.first().copied().unwrap_or(Colour::WHITE),
        }
    }

    /// The foreground mask of one tile, indexed `[y][x]`.
    pub fn tile(&self) -> [[bool; 8]; 8] {
        let mut tile = [[false; 8]; 8];
        for (y, row) in tile.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = self.is_foreground(x as i64, y as i64);
            }
        }
        tile
    }
}

/// Base-4 digits of `mode`, least significant first, at most four of them.
///
/// Digits the mode does not reach keep their default value, so mode 0
/// yields `[1, 0, 0, 0]`.
pub fn south_digits(mode: u64) -> [u8; 4] {
    let mut south = DEFAULT_SOUTH;
    let mut n = mode;
    for digit in south.iter_mut() {
        if n == 0 {
            break;
        }
        *digit = (n % 4) as u8;
        n /= 4;
    }
    south
}

/// Diagonal stride for a south digit: 0 -> 16, 1 -> 8, 2 -> 4, 3 -> 2.
fn stride_for(digit: u8) -> i64 {
    1 << (4 - i64::from(digit.min(3)))
}

/// Columns of the tile that may carry foreground for `mode`.
pub fn eligible_columns(mode: u64) -> impl Iterator<Item = i64> {
    (0..TILE_SIZE).filter(move |&xp| mode >= xp as u64)
}
