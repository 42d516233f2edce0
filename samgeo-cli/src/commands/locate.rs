//! Locate command - map a coordinate to its tile and mosaic pixel.

use clap::Args;
use samgeo::config::ConfigFile;
use samgeo::coord::{lng_lat_to_tile, tile_to_lng_lat, GeoExtent, GeoImage, TileCoord};
use samgeo::provider::{expand_template, quadkey};

use crate::error::CliError;

#[derive(Debug, Args)]
pub struct LocateArgs {
    /// Longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Mosaic extent as west,south,east,north
    #[arg(long, value_parser = parse_extent, allow_hyphen_values = true, requires_all = ["width", "height"])]
    pub extent: Option<GeoExtent>,

    /// Mosaic width in pixels
    #[arg(long, requires = "extent")]
    pub width: Option<u32>,

    /// Mosaic height in pixels
    #[arg(long, requires = "extent")]
    pub height: Option<u32>,

    /// Tile zoom level (defaults to map.zoom rounded up)
    #[arg(long)]
    pub zoom: Option<u8>,
}

/// Run the locate command.
pub fn run(args: LocateArgs, config: &ConfigFile) -> Result<(), CliError> {
    let zoom = match args.zoom {
        Some(zoom) => zoom,
        None => default_zoom(config)?,
    };
    let tile = lng_lat_to_tile(args.lng, args.lat, zoom)?;

    println!("Tile {}", tile);
    println!("  Quadkey: {}", quadkey(&tile));
    println!("  Extent:  {}", tile_extent(&tile));
    println!("  URL:     {}", expand_template(&config.provider.tile_url, &tile));

    if let (Some(extent), Some(width), Some(height)) = (args.extent, args.width, args.height) {
        let image = GeoImage::new(extent, width, height)?;
        let (x, y) = image.lng_lat_to_image_pixel(args.lng, args.lat)?;
        println!("Pixel ({:.2}, {:.2}) in {}x{} image", x, y, width, height);
    }
    Ok(())
}

/// Parses `west,south,east,north`.
fn parse_extent(s: &str) -> Result<GeoExtent, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;
    match values.as_slice() {
        &[west, south, east, north] => Ok(GeoExtent::new(west, south, east, north)),
        _ => Err("expected west,south,east,north".to_string()),
    }
}

fn default_zoom(config: &ConfigFile) -> Result<u8, CliError> {
    let zoom = config.map.zoom.ceil();
    if !(0.0..=u8::MAX as f64).contains(&zoom) {
        return Err(CliError::Config(format!(
            "Invalid map.zoom: {}",
            config.map.zoom
        )));
    }
    Ok(zoom as u8)
}

/// Geographic bounds of a single tile.
fn tile_extent(tile: &TileCoord) -> GeoExtent {
    GeoExtent::from_corners(
        tile_to_lng_lat(tile.x, tile.y + 1, tile.zoom),
        tile_to_lng_lat(tile.x + 1, tile.y, tile.zoom),
    )
}
