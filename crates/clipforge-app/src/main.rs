//! ClipForge - headless timeline preview.
//!
//! Usage:
//!   clipforge preview <TIMELINE>   Render one composited frame
//!   clipforge info <TIMELINE>      Show timeline information
//!   clipforge init <PATH>          Write a demo timeline

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clipforge_core::EngineConfig;

mod commands;
mod logging;

#[derive(Parser)]
#[command(
    name = "clipforge",
    about = "Short-form video timeline and compositing engine",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a timeline headlessly and snapshot one frame
    Preview {
        /// Timeline document
        path: PathBuf,

        /// Playhead position to start from (seconds)
        #[arg(long, default_value = "0")]
        at: f64,

        /// Simulated playback length before the snapshot (seconds)
        #[arg(long, default_value = "0")]
        play: f64,

        /// Write the frame as PPM
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show timeline information
    Info {
        /// Timeline document
        path: PathBuf,
    },

    /// Write a demo timeline
    Init {
        /// Output file
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path),
        None => EngineConfig::load_default(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    logging::init_logging(&config.logging);

    match cli.command {
        Commands::Preview { path, at, play, out } => {
            commands::preview::run(config, path, at, play, out)
        }
        Commands::Info { path } => commands::info::run(path),
        Commands::Init { path } => commands::init::run(path),
    }
}
