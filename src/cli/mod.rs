pub mod completions;
pub mod demo;
pub mod generate;
pub mod palette;
pub mod verify;

use clap::{Parser, Subcommand};

/// eightbyeight - Tileable 8x8 dither pattern sheets
#[derive(Parser, Debug)]
#[command(name = "eightbyeight")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log progress (same as RUST_LOG=eightbyeight=info)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a labelled sheet of patterns
    Generate(generate::GenerateArgs),

    /// Render the built-in showcase sheets
    Demo(demo::DemoArgs),

    /// Compare a reference sheet against regenerated patterns
    Verify(verify::VerifyArgs),

    /// List palette presets or show one
    Palette(palette::PaletteArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
