//! Ordered colour palettes.
//!
//! Index 0 is the background and index 1 the foreground. Larger palettes
//! are carried through to the output file's colour table even though the
//! pattern renderer only ever paints the first two entries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};

use super::Colour;

/// Maximum number of entries an indexed raster can address.
pub const MAX_PALETTE_LEN: usize = 256;

/// The 16-colour CGA palette, in hardware order.
const CGA: [Colour; 16] = [
    Colour::rgb(0x00, 0x00, 0x00), // 0  black
    Colour::rgb(0x00, 0x00, 0xAA), // 1  blue
    Colour::rgb(0x00, 0xAA, 0x00), // 2  green
    Colour::rgb(0x00, 0xAA, 0xAA), // 3  cyan
    Colour::rgb(0xAA, 0x00, 0x00), // 4  red
    Colour::rgb(0xAA, 0x00, 0xAA), // 5  magenta
    Colour::rgb(0xAA, 0x55, 0x00), // 6  brown
    Colour::rgb(0xAA, 0xAA, 0xAA), // 7  light grey
    Colour::rgb(0x55, 0x55, 0x55), // 8  dark grey
    Colour::rgb(0x55, 0x55, 0xFF), // 9  light blue
    Colour::rgb(0x55, 0xFF, 0x55), // 10 light green
    Colour::rgb(0x55, 0xFF, 0xFF), // 11 light cyan
    Colour::rgb(0xFF, 0x55, 0x55), // 12 light red
    Colour::rgb(0xFF, 0x55, 0xFF), // 13 light magenta
    Colour::rgb(0xFF, 0xFF, 0x55), // 14 yellow
    Colour::rgb(0xFF, 0xFF, 0xFF), // 15 white
];

/// The 16 named web colours in VGA order, as used by the colour-mode sheets.
const WEB16: [Colour; 16] = [
    Colour::rgb(0, 0, 0),       // 0  black
    Colour::rgb(128, 0, 0),     // 1  maroon
    Colour::rgb(0, 128, 0),     // 2  green
    Colour::rgb(128, 128, 0),   // 3  olive
    Colour::rgb(0, 0, 128),     // 4  navy
    Colour::rgb(128, 0, 128),   // 5  purple
    Colour::rgb(0, 128, 128),   // 6  teal
    Colour::rgb(128, 128, 128), // 7  grey
    Colour::rgb(192, 192, 192), // 8  silver
    Colour::rgb(255, 0, 0),     // 9  red
    Colour::rgb(0, 255, 0),     // 10 lime
    Colour::rgb(255, 255, 0),   // 11 yellow
    Colour::rgb(0, 0, 255),     // 12 blue
    Colour::rgb(255, 0, 255),   // 13 fuchsia
    Colour::rgb(0, 255, 255),   // 14 aqua
    Colour::rgb(255, 255, 255), // 15 white
];

/// Names accepted by [`Palette::preset`].
pub const PRESET_NAMES: [&str; 6] = ["classic", "terminal", "solarized", "cga", "web16", "bwgr"];

/// An ordered collection of colours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PaletteSpec", into = "Vec<Colour>")]
pub struct Palette {
    colours: Vec<Colour>,
}

/// Serialized form: either a preset name or an explicit colour list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PaletteSpec {
    Preset(String),
    Colours(Vec<Colour>),
}

impl TryFrom<PaletteSpec> for Palette {
    type Error = SheetError;

    fn try_from(spec: PaletteSpec) -> Result<Self> {
        match spec {
            PaletteSpec::Preset(name) => Self::preset(&name),
            PaletteSpec::Colours(colours) => Ok(Self::new(colours)),
        }
    }
}

impl From<Palette> for Vec<Colour> {
    fn from(palette: Palette) -> Self {
        palette.colours
    }
}

impl Palette {
    /// Create a palette from an ordered list of colours.
    pub fn new(colours: Vec<Colour>) -> Self {
        Self { colours }
    }

    /// Look up a builtin palette by name.
    pub fn preset(name: &str) -> Result<Self> {
        let colours = match name.trim().to_lowercase().as_str() {
            "classic" | "bw" => vec![Colour::WHITE, Colour::BLACK],
            "terminal" => vec![Colour::BLACK, Colour::rgb(0, 255, 0)],
            "solarized" => vec![Colour::rgb(253, 246, 227), Colour::rgb(7, 54, 66)],
            "cga" => CGA.to_vec(),
            "web16" => WEB16.to_vec(),
            "bwgr" => vec![Colour::BLACK, Colour::WHITE],
            other => {
                return Err(SheetError::Parse {
                    message: format!("Unknown palette preset: {}", other),
                    help: Some(format!("Available presets: {}", PRESET_NAMES.join(", "))),
                })
            }
        };
        Ok(Self::new(colours))
    }

    /// Parse a preset name or a comma-separated list of hex colours.
    ///
    /// A single token is a preset name first. It is read as one colour only
    /// when it starts with `#`, so a typo like `fab` reports the presets.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::new(vec![]));
        }
        if !s.contains(',') {
            return match Self::preset(s) {
                Err(_) if s.starts_with('#') => Ok(Self::new(vec![Colour::from_hex(s)?])),
                preset => preset,
            };
        }
        let colours = s
            .split(',')
            .map(Colour::from_hex)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(colours))
    }

    /// The palette padded with the default background (white) and foreground
    /// (black) so it always holds at least two entries.
    pub fn padded(&self) -> Vec<Colour> {
        let mut colours = self.colours.clone();
        if colours.is_empty() {
            colours.push(Colour::WHITE);
        }
        if colours.len() == 1 {
            colours.push(Colour::BLACK);
        }
        colours
    }

    /// Get all colours in order.
    pub fn colours(&self) -> &[Colour] {
        &self.colours
    }

    /// Get the number of colours.
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    /// Check if the palette is empty.
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(vec![Colour::WHITE, Colour::BLACK])
    }
}

impl FromStr for Palette {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.colours.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_black_on_white() {
        assert_eq!(Palette::default().colours(), &[Colour::WHITE, Colour::BLACK]);
    }

    #[test]
    fn test_padded() {
        assert_eq!(
            Palette::new(vec![]).padded(),
            vec![Colour::WHITE, Colour::BLACK]
        );
        assert_eq!(
            Palette::new(vec![Colour::rgb(9, 9, 9)]).padded(),
            vec![Colour::rgb(9, 9, 9), Colour::BLACK]
        );
        assert_eq!(Palette::preset("cga").unwrap().padded().len(), 16);
    }

    #[test]
    fn test_presets() {
        for name in PRESET_NAMES {
            assert!(Palette::preset(name).is_ok(), "preset {} missing", name);
        }
        let terminal = Palette::preset("Terminal").unwrap();
        assert_eq!(terminal.colours()[1], Colour::rgb(0, 255, 0));
        assert_eq!(Palette::preset("cga").unwrap().colours()[6], Colour::rgb(0xAA, 0x55, 0));
        assert_eq!(
            Palette::preset("web16").unwrap().colours()[8],
            Colour::rgb(192, 192, 192)
        );
        assert!(Palette::preset("sepia").is_err());
    }

    #[test]
    fn test_parse_hex_list() {
        let palette = Palette::parse("#FDF6E3, #073642").unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.colours()[1], Colour::rgb(7, 54, 66));

        let single = Palette::parse("#123").unwrap();
        assert_eq!(single.len(), 1);

        // Bare hex needs a list to be read as colours.
        let pair = Palette::parse("fab,000").unwrap();
        assert_eq!(pair.colours(), &[Colour::rgb(0xFF, 0xAA, 0xBB), Colour::BLACK]);

        assert!(Palette::parse("#FFF,nope").is_err());
        assert!(Palette::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_preset_name() {
        assert_eq!(Palette::parse("solarized").unwrap(), Palette::preset("solarized").unwrap());
        assert_eq!(Palette::parse(" CGA ").unwrap().len(), 16);
    }

    #[test]
    fn test_parse_single_token_prefers_presets() {
        // `fab` is valid hex but not a preset; it must not become one colour.
        match Palette::parse("fab") {
            Err(SheetError::Parse { help, .. }) => {
                assert!(help.unwrap().contains("Available presets"));
            }
            other => panic!("expected preset error, got {:?}", other),
        }
        assert_eq!(Palette::parse("#fab").unwrap().colours(), &[Colour::rgb(0xFF, 0xAA, 0xBB)]);
        assert!(Palette::parse("#nope").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let palette = Palette::preset("terminal").unwrap();
        assert_eq!(palette.to_string(), "#000000,#00FF00");
        assert_eq!(Palette::parse(&palette.to_string()).unwrap(), palette);
    }

    #[test]
    fn test_deserialize_forms() {
        let preset: Palette = serde_yaml::from_str("cga").unwrap();
        assert_eq!(preset.len(), 16);

        let list: Palette = serde_yaml::from_str("['#000', '#FFF']").unwrap();
        assert_eq!(list.colours(), &[Colour::BLACK, Colour::WHITE]);
    }
}
