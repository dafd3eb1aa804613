//! Verify command implementation.
//!
//! Splits a reference BMP into pattern blobs, pairs them with a mode list
//! and reports every pattern that does not match.

use std::fs;
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::bitmap::read_bmp;
use crate::error::{Result, SheetError};
use crate::output::{display_path, plural, Printer};
use crate::render::write_png;
use crate::types::Palette;
use crate::verify::{parse_modes, verify_image, Anchor};

/// Compare a reference sheet against regenerated patterns
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Reference sheet (BMP)
    #[arg(required = true)]
    pub reference: PathBuf,

    /// Modes in blob order, e.g. 0-255 or 114,110,106
    #[arg(long, default_value = "0-255")]
    pub modes: String,

    /// Palette the reference was drawn with
    #[arg(long, default_value = "classic")]
    pub palette: String,

    /// Pattern origin used when regenerating
    #[arg(long, value_enum, default_value = "blob")]
    pub anchor: AnchorArg,

    /// Write each blob to <DIR>/<mode>.png
    #[arg(long, value_name = "DIR")]
    pub extract: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorArg {
    /// Pattern starts at each blob's top-left corner
    Blob,
    /// Pattern starts at the sheet origin
    Sheet,
}

impl From<AnchorArg> for Anchor {
    fn from(arg: AnchorArg) -> Self {
        match arg {
            AnchorArg::Blob => Anchor::Blob,
            AnchorArg::Sheet => Anchor::Sheet,
        }
    }
}

pub fn run(args: VerifyArgs, printer: &Printer) -> Result<()> {
    let modes = parse_modes(&args.modes)?;
    let palette = Palette::parse(&args.palette)?;
    let display = display_path(&args.reference);

    printer.status("Verifying", &format!("{} against {}", display, plural(modes.len(), "mode", "modes")));

    let image = read_bmp(&args.reference)?;
    let report = verify_image(&image, &modes, &palette, args.anchor.into())?;

    if let Some(dir) = &args.extract {
        fs::create_dir_all(dir).map_err(|e| SheetError::Io {
            path: dir.clone(),
            message: format!("Failed to create output directory: {}", e),
        })?;
        for result in &report.results {
            write_png(&image.crop(result.rect), &dir.join(format!("{}.png", result.mode)), 1)?;
        }
        printer.info(
            "Extracted",
            &format!("{} to {}", plural(report.results.len(), "blob", "blobs"), display_path(dir)),
        );
    }

    for failure in report.failures() {
        printer.error(
            "Mismatch",
            &format!(
                "mode {} at ({}, {}): {} pixels differ {}",
                failure.mode,
                failure.rect.min_x,
                failure.rect.min_y,
                failure.differing,
                printer.dim(&format!("({:.2}%)", failure.percent()))
            ),
        );
    }
    if report.extra_blobs > 0 {
        printer.warning("Ignored", &plural(report.extra_blobs, "extra blob", "extra blobs"));
    }
    if !report.missing_modes.is_empty() {
        printer.warning(
            "Missing",
            &format!("no blob for {}", plural(report.missing_modes.len(), "mode", "modes")),
        );
    }

    let report = report.into_result()?;
    printer.success(
        "Verified",
        &format!("{} in {}", plural(report.results.len(), "pattern", "patterns"), display),
    );
    Ok(())
}
