//! Common types and utilities shared across CLI commands.

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use samgeo::config::ConfigFile;
use samgeo::coord::{TileCoord, WebMercator};
use samgeo::mosaic::{Mosaic, MosaicBuilder, Tile};
use samgeo::provider::{ReqwestClient, TileFetcher, TileSource, XyzTileProvider};
use samgeo::viewport::Viewport;
use tracing::info;

use crate::error::CliError;

/// Map view selection shared by commands that fetch tiles.
#[derive(Debug, Clone, Default, Args)]
pub struct ViewArgs {
    /// Named location from the [locations] config section
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub location: Option<String>,

    /// Center latitude in degrees
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Center longitude in degrees
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Map zoom (may be fractional)
    #[arg(long)]
    pub zoom: Option<f64>,

    /// View width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// View height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Tile URL template with {x}, {y}, {z} and optional {s} or {q}
    #[arg(long)]
    pub tile_url: Option<String>,
}

/// Resolve the viewport from CLI args and config.
///
/// Explicit coordinates win over a named location, which wins over the
/// configured map center. The same order applies to the zoom.
pub fn resolve_viewport(args: &ViewArgs, config: &ConfigFile) -> Result<Viewport, CliError> {
    let location = args
        .location
        .as_deref()
        .map(|name| config.location(name))
        .transpose()?;

    let (lat, lon) = match (args.lat, args.lon, location) {
        (Some(lat), Some(lon), _) => (lat, lon),
        (_, _, Some(loc)) => (loc.lat, loc.lon),
        _ => (config.map.center_lat, config.map.center_lon),
    };
    let zoom = args
        .zoom
        .or_else(|| location.and_then(|l| l.zoom))
        .unwrap_or(config.map.zoom);

    Ok(Viewport::new(lon, lat, zoom)
        .with_size(
            args.width.unwrap_or(config.map.viewport_width),
            args.height.unwrap_or(config.map.viewport_height),
        )
        .with_tile_size(config.provider.tile_size))
}

/// Create the tile fetcher for the configured provider.
pub fn build_fetcher(
    args: &ViewArgs,
    config: &ConfigFile,
) -> Result<TileFetcher<XyzTileProvider<ReqwestClient>>, CliError> {
    let client = ReqwestClient::with_timeout(config.provider_timeout())?;
    let template = args
        .tile_url
        .clone()
        .unwrap_or_else(|| config.provider.tile_url.clone());
    let provider = XyzTileProvider::new(client, template)?
        .with_zoom_range(config.provider.min_zoom, config.provider.max_zoom);
    Ok(TileFetcher::new(provider))
}

/// Download tiles with a progress bar.
pub fn fetch_tiles<S: TileSource>(fetcher: &TileFetcher<S>, coords: &[TileCoord]) -> Vec<Tile> {
    let pb = ProgressBar::new(coords.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} tiles {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("▉▊▋▌▍▎▏ "),
    );
    pb.set_message(fetcher.source().name().to_string());

    let tiles = fetcher.fetch_with_progress(coords, |_, _| pb.inc(1));

    let missing = tiles.iter().filter(|t| !t.has_data()).count();
    pb.finish_with_message(if missing == 0 {
        "done".to_string()
    } else {
        format!("done, {} unavailable", missing)
    });
    tiles
}

/// Fetch every tile covering `viewport` and stitch them together.
pub fn build_view_mosaic<S: TileSource>(
    fetcher: &TileFetcher<S>,
    viewport: &Viewport,
    config: &ConfigFile,
) -> Result<Mosaic, CliError> {
    let coords = viewport.visible_tiles()?;
    info!(
        tiles = coords.len(),
        zoom = viewport.zoom,
        "Fetching visible tiles"
    );

    let tiles = fetch_tiles(fetcher, &coords);
    let mosaic = mosaic_builder(config).build(&tiles, viewport.zoom, &WebMercator)?;
    Ok(mosaic)
}

pub fn mosaic_builder(config: &ConfigFile) -> MosaicBuilder {
    MosaicBuilder::new(config.provider.tile_size)
        .with_duplicate_policy(config.mosaic.duplicate_policy)
}
