//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (longitude/latitude)
//! and Web Mercator tile coordinates, plus the mapping between a
//! georeferenced mosaic raster and the globe.
//!
//! Coordinates are ordered `(lng, lat)` throughout, matching GeoJSON.

mod geo_image;
mod types;

pub use geo_image::GeoImage;
pub use types::{
    CoordError, GeoExtent, TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON, MIN_ZOOM,
};

use std::f64::consts::PI;

/// Converts a longitude to normalized Web Mercator X (0.0 west edge, 1.0 east edge).
#[inline]
pub fn mercator_x(lng: f64) -> f64 {
    (lng + 180.0) / 360.0
}

/// Converts a latitude to normalized Web Mercator Y (0.0 north edge, 1.0 south edge).
#[inline]
pub fn mercator_y(lat: f64) -> f64 {
    let lat_rad = lat.to_radians();
    (1.0 - lat_rad.tan().asinh() / PI) / 2.0
}

/// Inverse of [`mercator_x`].
#[inline]
pub fn lng_from_mercator_x(mx: f64) -> f64 {
    mx * 360.0 - 180.0
}

/// Inverse of [`mercator_y`].
#[inline]
pub fn lat_from_mercator_y(my: f64) -> f64 {
    (PI * (1.0 - 2.0 * my)).sinh().atan().to_degrees()
}

/// Converts geographic coordinates to the tile containing them.
///
/// # Arguments
///
/// * `lng` - Longitude in degrees (-180.0 to 180.0)
/// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
/// * `zoom` - Zoom level (0 to 22)
#[inline]
pub fn lng_lat_to_tile(lng: f64, lat: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lng) {
        return Err(CoordError::InvalidLongitude(lng));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    let n = (1u64 << zoom) as f64;
    let max_index = (1u64 << zoom) - 1;

    // The east and south edges belong to the last tile, not to a tile past the grid
    let x = ((mercator_x(lng) * n) as u64).min(max_index) as u32;
    let y = ((mercator_y(lat) * n) as u64).min(max_index) as u32;

    Ok(TileCoord { x, y, zoom })
}

/// Converts a tile grid point to the geographic coordinates of that point.
///
/// For a tile `(x, y)` this is its north-west corner; `(x + 1, y + 1)` is its
/// south-east corner. Values up to `2^zoom` are valid grid points.
#[inline]
pub fn tile_to_lng_lat(x: u32, y: u32, zoom: u8) -> (f64, f64) {
    let n = (1u64 << zoom) as f64;
    let lng = lng_from_mercator_x(x as f64 / n);
    let lat = lat_from_mercator_y(y as f64 / n);
    (lng, lat)
}

/// Converts a tile grid point to geographic coordinates.
///
/// Mosaic extents are computed by projecting the grid corners of the tile
/// bounding box through this trait.
pub trait TileProjector {
    /// Projects grid point `(x, y)` at `zoom` to `(lng, lat)`.
    fn tile_to_lng_lat(&self, x: u32, y: u32, zoom: u8) -> (f64, f64);
}

/// Standard spherical Web Mercator projection (EPSG:3857 tiling).
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

impl TileProjector for WebMercator {
    fn tile_to_lng_lat(&self, x: u32, y: u32, zoom: u8) -> (f64, f64) {
        tile_to_lng_lat(x, y, zoom)
    }
}

impl<F> TileProjector for F
where
    F: Fn(u32, u32, u8) -> (f64, f64),
{
    fn tile_to_lng_lat(&self, x: u32, y: u32, zoom: u8) -> (f64, f64) {
        self(x, y, zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_york_city_at_zoom_16() {
        // New York City: 40.7128°N, 74.0060°W
        let tile = lng_lat_to_tile(-74.0060, 40.7128, 16).unwrap();
        assert_eq!(tile.y, 24640);
        assert_eq!(tile.x, 19295);
        assert_eq!(tile.zoom, 16);
    }

    #[test]
    fn test_invalid_latitude() {
        let result = lng_lat_to_tile(0.0, 90.0, 10);
        assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
    }

    #[test]
    fn test_invalid_longitude() {
        let result = lng_lat_to_tile(181.0, 0.0, 10);
        assert!(matches!(result, Err(CoordError::InvalidLongitude(_))));
    }

    #[test]
    fn test_invalid_zoom() {
        let result = lng_lat_to_tile(0.0, 0.0, 23);
        assert!(matches!(result, Err(CoordError::InvalidZoom(23))));
    }

    #[test]
    fn test_east_edge_stays_on_grid() {
        let tile = lng_lat_to_tile(180.0, 0.0, 3).unwrap();
        assert_eq!(tile.x, 7);
    }

    #[test]
    fn test_tile_to_lng_lat_origin() {
        let (lng, lat) = tile_to_lng_lat(0, 0, 0);
        assert_eq!(lng, -180.0);
        assert!((lat - MAX_LAT).abs() < 1e-6);
    }

    #[test]
    fn test_tile_to_lng_lat_far_corner() {
        let (lng, lat) = tile_to_lng_lat(4, 4, 2);
        assert_eq!(lng, 180.0);
        assert!((lat - MIN_LAT).abs() < 1e-6);
    }

    #[test]
    fn test_tile_to_lng_lat_at_equator() {
        let (lng, lat) = tile_to_lng_lat(512, 512, 10);
        assert!(lng.abs() < 1e-9, "Should be on prime meridian");
        assert!(lat.abs() < 1e-9, "Should be on equator");
    }

    #[test]
    fn test_closure_projector() {
        let projector = |x: u32, y: u32, z: u8| (x as f64, y as f64 + z as f64);
        assert_eq!(projector.tile_to_lng_lat(2, 3, 4), (2.0, 7.0));
    }

    #[test]
    fn test_web_mercator_projector_matches_function() {
        assert_eq!(
            WebMercator.tile_to_lng_lat(13_674, 6_716, 14),
            tile_to_lng_lat(13_674, 6_716, 14)
        );
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_tile_contains_source_point(
                lng in -179.99..179.99_f64,
                lat in -85.0..85.0_f64,
                zoom in 0u8..=20
            ) {
                let tile = lng_lat_to_tile(lng, lat, zoom)?;
                let (west, north) = tile_to_lng_lat(tile.x, tile.y, zoom);
                let (east, south) = tile_to_lng_lat(tile.x + 1, tile.y + 1, zoom);

                prop_assert!(west <= lng + 1e-9 && lng <= east + 1e-9);
                prop_assert!(south <= lat + 1e-9 && lat <= north + 1e-9);
            }

            #[test]
            fn test_tile_coords_in_bounds(
                lng in -180.0..=180.0_f64,
                lat in -85.05..85.05_f64,
                zoom in 0u8..=22
            ) {
                let tile = lng_lat_to_tile(lng, lat, zoom)?;
                let max_tile = 1u64 << zoom;
                prop_assert!((tile.x as u64) < max_tile);
                prop_assert!((tile.y as u64) < max_tile);
            }

            #[test]
            fn test_mercator_roundtrip(lng in -180.0..180.0_f64, lat in -85.0..85.0_f64) {
                prop_assert!((lng_from_mercator_x(mercator_x(lng)) - lng).abs() < 1e-9);
                prop_assert!((lat_from_mercator_y(mercator_y(lat)) - lat).abs() < 1e-9);
            }

            #[test]
            fn test_latitude_decreases_with_row(row in 0u32..65_535, zoom in 16u8..=18) {
                let (_, upper) = tile_to_lng_lat(0, row, zoom);
                let (_, lower) = tile_to_lng_lat(0, row + 1, zoom);
                prop_assert!(upper > lower);
            }
        }
    }
}
