//! Mosaic command - stitch the tiles of a view into one PNG.

use std::path::PathBuf;

use clap::Args;
use samgeo::config::ConfigFile;

use super::common::{build_fetcher, build_view_mosaic, resolve_viewport, ViewArgs};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct MosaicArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Output PNG path
    #[arg(short, long, default_value = "mosaic.png")]
    pub output: PathBuf,
}

/// Run the mosaic command.
pub fn run(args: MosaicArgs, config: &ConfigFile) -> Result<(), CliError> {
    let viewport = resolve_viewport(&args.view, config)?;
    let fetcher = build_fetcher(&args.view, config)?;
    let mosaic = build_view_mosaic(&fetcher, &viewport, config)?;

    mosaic.save_png(&args.output)?;

    let [west, south, east, north] = mosaic.extent.to_array();
    println!("Mosaic: {}", args.output.display());
    println!("  Size:   {}x{} px", mosaic.width, mosaic.height);
    println!(
        "  Tiles:  {}x{} at zoom {}",
        mosaic.bounds.columns(),
        mosaic.bounds.rows(),
        mosaic.zoom
    );
    println!("  Extent: [{}, {}, {}, {}]", west, south, east, north);
    Ok(())
}
