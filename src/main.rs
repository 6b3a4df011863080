//! Permaroute - resolve and canonicalize content paths from the command line.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use permaroute::cli::{Cli, Commands, resolve::run_resolve, template::run_template};
use permaroute::logger;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Resolve { args } => run_resolve(&cli, args).await,
        Commands::Template { args } => run_template(args),
    }
}
