//! Sheet configuration (YAML).
//!
//! Every key is optional. Missing keys take the classic sheet defaults:
//! a ten by four grid of 64px cells titled "Grid Draw", black on white.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};
use crate::layout::DEFAULT_LABEL_TEMPLATE;
use crate::types::{Palette, MAX_PALETTE_LEN};

/// Largest canvas, in pixels, a sheet may allocate.
pub const MAX_CANVAS_PIXELS: u64 = 1 << 28;

/// Label font, in points at a given DPI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub size: f32,
    pub dpi: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            size: 16.0,
            dpi: 150.0,
        }
    }
}

/// Everything needed to generate one sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Heading drawn above the grid.
    pub title: String,

    pub rows: u32,

    pub columns: u32,

    /// Nominal cell edge in pixels.
    pub cell_size: u32,

    /// Preset name or list of colours. Index 0 is the background.
    pub palette: Palette,

    pub font: FontConfig,

    /// Text measured to size each cell column, so the widest label fits.
    pub label_template: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            title: "Grid Draw".to_string(),
            rows: 10,
            columns: 4,
            cell_size: 64,
            palette: Palette::default(),
            font: FontConfig::default(),
            label_template: DEFAULT_LABEL_TEMPLATE.to_string(),
        }
    }
}

impl SheetConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SheetError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse and validate config YAML.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).map_err(|e| SheetError::Parse {
            message: format!("Invalid sheet config: {}", e),
            help: Some("Check the YAML syntax and key names".to_string()),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no sheet can be drawn with.
    pub fn validate(&self) -> Result<()> {
        if self.cell_size == 0 {
            return Err(SheetError::Config {
                message: "cell_size must be greater than zero".to_string(),
                help: Some("Patterns repeat every 8px, so 64 is a good start".to_string()),
            });
        }
        if self.palette.len() > MAX_PALETTE_LEN {
            return Err(SheetError::Config {
                message: format!(
                    "palette has {} colours, the limit is {}",
                    self.palette.len(),
                    MAX_PALETTE_LEN
                ),
                help: None,
            });
        }
        // Cells alone set a lower bound on the canvas; text only adds to it.
        let min_width = u64::from(self.columns) * u64::from(self.cell_size);
        let min_height = u64::from(self.rows) * u64::from(self.cell_size);
        check_canvas(min_width, min_height).map_err(|_| SheetError::Config {
            message: format!(
                "a {}x{} grid of {}px cells is too large to draw",
                self.rows, self.columns, self.cell_size
            ),
            help: Some("Use fewer rows or columns, or a smaller cell_size".to_string()),
        })?;
        if !(self.font.size > 0.0 && self.font.size.is_finite()) {
            return Err(SheetError::Config {
                message: format!("font size must be positive, got {}", self.font.size),
                help: Some("Sizes are in points, e.g. `size: 16`".to_string()),
            });
        }
        if !(self.font.dpi > 0.0 && self.font.dpi.is_finite()) {
            return Err(SheetError::Config {
                message: format!("font dpi must be positive, got {}", self.font.dpi),
                help: None,
            });
        }
        Ok(())
    }
}

/// Reject canvases that cannot be addressed or allocated.
pub fn check_canvas(width: u64, height: u64) -> Result<()> {
    let pixels = width.max(1).saturating_mul(height.max(1));
    let addressable = width <= u64::from(u32::MAX) && height <= u64::from(u32::MAX);
    if !addressable || pixels > MAX_CANVAS_PIXELS {
        return Err(SheetError::Config {
            message: format!("canvas of {}x{} pixels is too large", width, height),
            help: Some(format!("Sheets are limited to {} pixels", MAX_CANVAS_PIXELS)),
        });
    }
    Ok(())
}
