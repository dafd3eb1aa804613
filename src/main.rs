use clap::Parser;
use eightbyeight::cli::{Cli, Commands};
use eightbyeight::output::Printer;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "eightbyeight=info"
    } else {
        "eightbyeight=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let printer = Printer::new();

    match cli.command {
        Commands::Generate(args) => eightbyeight::cli::generate::run(args, &printer)?,
        Commands::Demo(args) => eightbyeight::cli::demo::run(args, &printer)?,
        Commands::Verify(args) => eightbyeight::cli::verify::run(args, &printer)?,
        Commands::Palette(args) => eightbyeight::cli::palette::run(args, &printer)?,
        Commands::Completions(args) => eightbyeight::cli::completions::run(args)?,
    }

    Ok(())
}
