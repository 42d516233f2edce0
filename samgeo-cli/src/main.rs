//! SAMGeo CLI - Command-line interface
//!
//! Builds satellite mosaics for a map view and requests their Segment
//! Anything embeddings from a remote service.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use samgeo::config::ConfigFile;
use tracing::debug;

use commands::config::ConfigCommands;
use commands::embed::EmbedArgs;
use commands::locate::LocateArgs;
use commands::mosaic::MosaicArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "samgeo")]
#[command(version, about = "Satellite tile mosaics and SAM embeddings", long_about = None)]
struct Cli {
    /// Log filter (overrides logging.level, e.g. "debug" or "samgeo=trace")
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// View or modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    #[command(flatten)]
    Map(MapCommands),
}

/// Commands that run against the loaded configuration.
#[derive(Debug, Subcommand)]
enum MapCommands {
    /// Stitch the tiles of a map view into a PNG mosaic
    Mosaic(MosaicArgs),

    /// Build a view mosaic and fetch its embedding
    Embed(EmbedArgs),

    /// Show the tile containing a coordinate
    Locate(LocateArgs),

    /// List named locations
    Locations,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Config { command } => commands::config::run(command),
        Commands::Map(command) => run_with_config(command, cli.log_level.as_deref()),
    }
}

fn run_with_config(command: MapCommands, log_level: Option<&str>) -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    let level = log_level.unwrap_or(config.logging.level.as_str());
    let _log_guard = samgeo::logging::init(level, config.logging.file.as_deref())?;
    debug!(config = %samgeo::config::config_file_path().display(), "Configuration loaded");

    match command {
        MapCommands::Mosaic(args) => commands::mosaic::run(args, &config),
        MapCommands::Embed(args) => commands::embed::run(args, &config),
        MapCommands::Locate(args) => commands::locate::run(args, &config),
        MapCommands::Locations => commands::locations::run(&config),
    }
}
