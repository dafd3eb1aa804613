use clap::Args;

use crate::error::Result;
use crate::output::{plural, Printer};
use crate::types::{Palette, PRESET_NAMES};

/// List palette presets, or print the colours of one
#[derive(Args, Debug)]
pub struct PaletteArgs {
    /// Preset name or comma-separated hex colours
    pub name: Option<String>,
}

pub fn run(args: PaletteArgs, printer: &Printer) -> Result<()> {
    let Some(name) = args.name else {
        for preset in PRESET_NAMES {
            let palette = Palette::preset(preset)?;
            println!("{:<10} {}", preset, printer.dim(&palette.to_string()));
        }
        return Ok(());
    };

    let palette = Palette::parse(&name)?;
    printer.info("Palette", &format!("{} ({})", name, plural(palette.len(), "colour", "colours")));

    // One colour per line on stdout, index first.
    for (i, colour) in palette.colours().iter().enumerate() {
        println!("{:>3} {}", i, colour);
    }

    Ok(())
}
