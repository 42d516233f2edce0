//! Coordinate types and errors.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum latitude representable in Web Mercator.
pub const MAX_LAT: f64 = 85.05112878;
/// Minimum latitude representable in Web Mercator.
pub const MIN_LAT: f64 = -85.05112878;
/// Maximum longitude.
pub const MAX_LON: f64 = 180.0;
/// Minimum longitude.
pub const MIN_LON: f64 = -180.0;
/// Minimum supported zoom level.
pub const MIN_ZOOM: u8 = 0;
/// Maximum supported zoom level (satellite providers stop around 22).
pub const MAX_ZOOM: u8 = 22;

/// Errors produced by coordinate conversions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    #[error("Invalid latitude: {0} (must be within ±85.05112878)")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0} (must be within ±180)")]
    InvalidLongitude(f64),

    #[error("Invalid zoom level: {0} (max 22)")]
    InvalidZoom(u8),

    /// The point does not fall on the georeferenced image.
    #[error("Coordinate ({lng}, {lat}) lies outside the image")]
    OutsideImage { lng: f64, lat: f64 },

    /// The extent or pixel size has no area.
    #[error("Degenerate image geometry: {0}")]
    DegenerateImage(String),
}

/// A Web Mercator (XYZ / slippy map) tile coordinate.
///
/// `x` grows west to east, `y` grows north to south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    /// Grid column
    pub x: u32,
    /// Grid row
    pub y: u32,
    /// Zoom level
    pub zoom: u8,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    pub fn new(x: u32, y: u32, zoom: u8) -> Self {
        Self { x, y, zoom }
    }

    /// Number of tiles along one axis at this tile's zoom level.
    #[inline]
    pub fn grid_size(&self) -> u64 {
        1u64 << self.zoom
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Geographic bounding box in degrees, ordered `[west, south, east, north]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoExtent {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoExtent {
    /// Creates an extent from its four edges.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Builds an extent from the south-west and north-east `(lng, lat)` corners.
    pub fn from_corners(south_west: (f64, f64), north_east: (f64, f64)) -> Self {
        Self::new(south_west.0, south_west.1, north_east.0, north_east.1)
    }

    /// Returns the extent as `[west, south, east, north]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }

    /// Returns true if `(lng, lat)` lies within the extent (edges inclusive).
    pub fn contains(&self, lng: f64, lat: f64) -> bool {
        (self.west..=self.east).contains(&lng) && (self.south..=self.north).contains(&lat)
    }
}

impl From<[f64; 4]> for GeoExtent {
    fn from(a: [f64; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }
}

impl fmt::Display for GeoExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.8}, {:.8}, {:.8}, {:.8}]",
            self.west, self.south, self.east, self.north
        )
    }
}
