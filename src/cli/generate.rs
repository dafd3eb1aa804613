//! Generate command implementation.
//!
//! Builds a sheet config from an optional YAML file plus command-line
//! overrides, renders it, and writes the image (and optionally a cell map).

use std::path::PathBuf;

use clap::Args;

use crate::config::SheetConfig;
use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::render::{write_cell_map, MAX_SCALE};
use crate::sheet::{generate_with_layout, save};
use crate::types::Palette;

/// Render a labelled sheet of patterns
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Sheet config file (YAML)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Title drawn above the grid
    #[arg(long)]
    pub title: Option<String>,

    /// Number of rows
    #[arg(long)]
    pub rows: Option<u32>,

    /// Number of columns
    #[arg(long)]
    pub columns: Option<u32>,

    /// Cell edge in pixels
    #[arg(long)]
    pub cell_size: Option<u32>,

    /// Palette preset or comma-separated hex colours (background first)
    #[arg(long)]
    pub palette: Option<String>,

    /// Label font size in points
    #[arg(long)]
    pub font_size: Option<f32>,

    /// Resolution used to convert the font size to pixels
    #[arg(long)]
    pub dpi: Option<f32>,

    /// Text measured to size the cell columns
    #[arg(long)]
    pub label_template: Option<String>,

    /// Output file (.png for PNG, anything else for BMP)
    #[arg(long, short, default_value = "out.bmp")]
    pub output: PathBuf,

    /// Scale factor for PNG output (integer upscaling)
    #[arg(
        long,
        default_value = "1",
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_SCALE))
    )]
    pub scale: u32,

    /// Also write a JSON map of cell positions
    #[arg(long)]
    pub cells: Option<PathBuf>,
}

impl GenerateArgs {
    /// Resolve the effective config: file (or defaults), then flags.
    pub fn to_config(&self) -> Result<SheetConfig> {
        let mut config = match &self.config {
            Some(path) => SheetConfig::load(path)?,
            None => SheetConfig::default(),
        };

        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(columns) = self.columns {
            config.columns = columns;
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        if let Some(palette) = &self.palette {
            config.palette = Palette::parse(palette)?;
        }
        if let Some(size) = self.font_size {
            config.font.size = size;
        }
        if let Some(dpi) = self.dpi {
            config.font.dpi = dpi;
        }
        if let Some(template) = &self.label_template {
            config.label_template = template.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn run(args: GenerateArgs, printer: &Printer) -> Result<()> {
    let config = args.to_config()?;

    printer.status(
        "Generating",
        &format!(
            "{} {}",
            config.title,
            printer.dim(&format!("({}x{} @ {}px)", config.rows, config.columns, config.cell_size))
        ),
    );

    let sheet = generate_with_layout(&config)?;
    save(&sheet.image, &args.output, args.scale)?;

    let (width, height) = sheet.image.size();
    printer.success(
        "Finished",
        &format!(
            "{} {}",
            printer.cyan(&display_path(&args.output)),
            printer.dim(&format!(
                "({}x{}, {})",
                width,
                height,
                plural(sheet.layout.cells.len(), "cell", "cells")
            ))
        ),
    );

    if let Some(cells) = &args.cells {
        let image_name = args
            .output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        write_cell_map(
            &sheet.layout,
            &config.title,
            sheet.image.palette(),
            &image_name,
            cells,
        )?;
        printer.info("Cell map", &display_path(cells));
    }

    Ok(())
}
