//! CLI Module
//!
//! Command-line interface for the Furnish layout pipeline.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Furnish - recover room layouts from generative model output
#[derive(Parser, Debug)]
#[command(name = "furnish")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline and print the sanitized layout
    #[command(name = "process")]
    Process {
        /// File with raw model output ('-' for stdin)
        input: PathBuf,

        /// Asset manifest JSON file
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        #[command(flatten)]
        grid: GridArgs,

        /// Write the layout here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Recover JSON from raw model output
    #[command(name = "extract")]
    Extract {
        /// File with raw model output ('-' for stdin)
        input: PathBuf,
    },

    /// Recover and normalize without geometry correction
    #[command(name = "normalize")]
    Normalize {
        /// File with raw model output ('-' for stdin)
        input: PathBuf,

        /// Asset manifest JSON file
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },

    /// Sanitize an already canonical layout
    #[command(name = "sanitize")]
    Sanitize {
        /// Canonical layout JSON file ('-' for stdin)
        layout: PathBuf,

        /// Asset manifest JSON file
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        #[command(flatten)]
        grid: GridArgs,
    },
}

/// Overrides for the environment configuration
#[derive(Args, Debug, Clone, Default)]
pub struct GridArgs {
    /// Placement grid increment in meters
    #[arg(long)]
    pub snap: Option<f64>,

    /// Fallback room width in meters
    #[arg(long)]
    pub room_width: Option<f64>,

    /// Fallback room depth in meters
    #[arg(long)]
    pub room_depth: Option<f64>,

    /// Fallback room height in meters
    #[arg(long)]
    pub room_height: Option<f64>,
}
