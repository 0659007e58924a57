// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "depthcap")]
#[command(about = "LiDAR depth snapshot capture and export tool")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture one snapshot and export it
    Capture {
        /// Output directory (default: ~/Documents/depthcap)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip saving color/depth images to the gallery
        #[arg(long)]
        no_gallery: bool,

        /// Discard the export outcome (best-effort mode)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Stream frames and print depth statistics
    Watch {
        /// Time in seconds to run before exiting
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Frame interval in milliseconds
        #[arg(short, long, default_value = "500")]
        interval: u64,
    },

    /// List export sets in the snapshot directory
    List {
        /// Directory to scan (default: ~/Documents/depthcap)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Show the contents of one export set
    Info {
        /// Timestamp stem of the export set (from 'depthcap list')
        stem: String,

        /// Directory containing the set (default: ~/Documents/depthcap)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=depthcap=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Capture {
            output,
            no_gallery,
            quiet,
        } => cli::capture(output, no_gallery, quiet),
        Commands::Watch { timeout, interval } => cli::watch(timeout, interval),
        Commands::List { dir } => cli::list_exports(dir),
        Commands::Info { stem, dir } => cli::show_info(&stem, dir),
    }
}
