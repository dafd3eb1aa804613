//! Demo command: renders the showcase sheets.

use std::fs;
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::config::SheetConfig;
use crate::error::{Result, SheetError};
use crate::output::{display_path, plural, Printer};
use crate::render::MAX_SCALE;
use crate::sheet::{generate, save};
use crate::types::Palette;

/// Render the built-in showcase sheets
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Output directory
    #[arg(long, short, default_value = ".")]
    pub output: PathBuf,

    /// Image format
    #[arg(long, value_enum, default_value = "bmp")]
    pub format: ImageFormat,

    /// Scale factor for PNG output (integer upscaling)
    #[arg(
        long,
        default_value = "1",
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_SCALE))
    )]
    pub scale: u32,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Bmp,
    Png,
}

impl ImageFormat {
    fn extension(self) -> &'static str {
        match self {
            ImageFormat::Bmp => "bmp",
            ImageFormat::Png => "png",
        }
    }
}

/// The showcase sheets as (file stem, config).
pub fn demo_sheets() -> Result<Vec<(&'static str, SheetConfig)>> {
    let sheet = |title: &str, rows: u32, columns: u32, palette: &str| -> Result<SheetConfig> {
        Ok(SheetConfig {
            title: title.to_string(),
            rows,
            columns,
            palette: Palette::preset(palette)?,
            ..SheetConfig::default()
        })
    };

    Ok(vec![
        ("out_bw", sheet("Classic - Black on White", 64, 4, "classic")?),
        ("out_terminal", sheet("Terminal - Green on Black", 64, 4, "terminal")?),
        ("out_solarized", sheet("Solarized Light", 64, 4, "solarized")?),
        ("out_mixing", sheet("CGA Color Mixing", 16, 16, "cga")?),
    ])
}

pub fn run(args: DemoArgs, printer: &Printer) -> Result<()> {
    if !args.output.exists() {
        fs::create_dir_all(&args.output).map_err(|e| SheetError::Io {
            path: args.output.clone(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    let sheets = demo_sheets()?;
    for (stem, config) in &sheets {
        let path = args
            .output
            .join(format!("{}.{}", stem, args.format.extension()));
        printer.status("Generating", &config.title);

        let image = generate(config)?;
        save(&image, &path, args.scale)?;
        printer.info("Wrote", &printer.cyan(&display_path(&path)));
    }

    printer.success(
        "Finished",
        &format!("{} in {}", plural(sheets.len(), "sheet", "sheets"), display_path(&args.output)),
    );
    Ok(())
}
