//! Furnish CLI - Generated Room Layout Recovery
//!
//! Command-line interface over the layout recovery pipeline.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use furnish::cli::{commands, Cli, Commands};
use furnish::FurnishError;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FURNISH_LOG")
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Furnish v{}", env!("CARGO_PKG_VERSION"));

    if let Err(err) = handle_command(cli.command) {
        report(&err);
        return Err(anyhow::Error::new(err).context("command failed"));
    }
    Ok(())
}

fn handle_command(cmd: Commands) -> furnish::Result<()> {
    match cmd {
        Commands::Process {
            input,
            manifest,
            grid,
            output,
        } => commands::process(&input, manifest.as_deref(), &grid, output.as_deref()),
        Commands::Extract { input } => commands::extract(&input),
        Commands::Normalize { input, manifest } => commands::normalize(&input, manifest.as_deref()),
        Commands::Sanitize {
            layout,
            manifest,
            grid,
        } => commands::sanitize(&layout, manifest.as_deref(), &grid),
    }
}

fn report(err: &FurnishError) {
    eprintln!("error [{}]: {}", err.error_code(), err);
    for suggestion in err.recovery_suggestions() {
        eprintln!("  - {}", suggestion);
    }
}
