//! Mosaic input types and errors.

use std::fmt;

use image::RgbaImage;
use thiserror::Error;

use crate::coord::TileCoord;

/// Default edge length of a raster tile in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Errors that can occur while assembling a mosaic.
#[derive(Debug, Error)]
pub enum MosaicError {
    /// No tiles were supplied, so there is no bounding box to draw.
    #[error("Cannot build a mosaic from an empty tile set")]
    EmptyTileSet,

    #[error("Invalid tile size: {0}")]
    InvalidTileSize(u32),

    #[error("Invalid zoom level: {0}")]
    InvalidZoom(f64),

    /// Two tiles share a grid cell under [`DuplicatePolicy::Reject`].
    #[error("Duplicate tile at grid cell ({x}, {y})")]
    DuplicateTile { x: u32, y: u32 },

    #[error("Mosaic too large: {columns}×{rows} tiles of {tile_size}px")]
    TooLarge {
        columns: u64,
        rows: u64,
        tile_size: u32,
    },

    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A loaded map tile.
///
/// `data` is `None` while the tile's imagery is missing; such tiles still
/// contribute to the bounding box but leave their cell blank.
#[derive(Debug, Clone)]
pub struct Tile {
    pub coord: TileCoord,
    pub data: Option<RgbaImage>,
}

impl Tile {
    /// Creates a tile with imagery.
    pub fn new(x: u32, y: u32, zoom: u8, data: RgbaImage) -> Self {
        Self {
            coord: TileCoord::new(x, y, zoom),
            data: Some(data),
        }
    }

    /// Creates a tile whose imagery is not available.
    pub fn missing(coord: TileCoord) -> Self {
        Self { coord, data: None }
    }

    /// Returns true if the tile carries imagery.
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }
}

/// How tiles that share a grid cell are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Tiles are drawn in iteration order; a later tile with imagery
    /// overwrites an earlier one in the same cell.
    #[default]
    LastWriterWins,
    /// Fail with [`MosaicError::DuplicateTile`] before drawing anything.
    Reject,
}

impl DuplicatePolicy {
    /// Parses a policy name as written in the config file.
    pub fn from_config_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "last_writer_wins" | "last-writer-wins" | "overwrite" => Some(Self::LastWriterWins),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }

    /// Name used in the config file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastWriterWins => "last_writer_wins",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive bounding rectangle of a tile set in grid space.
///
/// Invariant: `min_x <= max_x` and `min_y <= max_y`. An empty tile set has
/// no bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl GridBounds {
    /// Computes the componentwise min/max over the coordinates in one pass.
    pub fn from_coords<'a, I>(coords: I) -> Result<Self, MosaicError>
    where
        I: IntoIterator<Item = &'a TileCoord>,
    {
        coords
            .into_iter()
            .fold(None, |bounds: Option<GridBounds>, c| {
                Some(match bounds {
                    None => GridBounds {
                        min_x: c.x,
                        min_y: c.y,
                        max_x: c.x,
                        max_y: c.y,
                    },
                    Some(b) => GridBounds {
                        min_x: b.min_x.min(c.x),
                        min_y: b.min_y.min(c.y),
                        max_x: b.max_x.max(c.x),
                        max_y: b.max_y.max(c.y),
                    },
                })
            })
            .ok_or(MosaicError::EmptyTileSet)
    }

    /// Number of tile columns covered.
    pub fn columns(&self) -> u64 {
        (self.max_x - self.min_x) as u64 + 1
    }

    /// Number of tile rows covered.
    pub fn rows(&self) -> u64 {
        (self.max_y - self.min_y) as u64 + 1
    }

    /// Pixel offset of a cell's top-left corner inside the mosaic.
    pub fn cell_offset(&self, x: u32, y: u32, tile_size: u32) -> (u64, u64) {
        (
            (x - self.min_x) as u64 * tile_size as u64,
            (y - self.min_y) as u64 * tile_size as u64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_of_empty_set() {
        let coords: Vec<TileCoord> = Vec::new();
        assert!(matches!(
            GridBounds::from_coords(&coords),
            Err(MosaicError::EmptyTileSet)
        ));
    }

    #[test]
    fn test_bounds_single_coord() {
        let coords = [TileCoord::new(7, 9, 12)];
        let bounds = GridBounds::from_coords(&coords).unwrap();
        assert_eq!(bounds.columns(), 1);
        assert_eq!(bounds.rows(), 1);
        assert_eq!(bounds.cell_offset(7, 9, 256), (0, 0));
    }

    #[test]
    fn test_bounds_spanning_set() {
        let coords = [
            TileCoord::new(4, 10, 5),
            TileCoord::new(2, 12, 5),
            TileCoord::new(6, 11, 5),
        ];
        let bounds = GridBounds::from_coords(&coords).unwrap();
        assert_eq!(
            bounds,
            GridBounds {
                min_x: 2,
                min_y: 10,
                max_x: 6,
                max_y: 12
            }
        );
        assert_eq!(bounds.columns(), 5);
        assert_eq!(bounds.rows(), 3);
        assert_eq!(bounds.cell_offset(4, 11, 256), (512, 256));
    }

    #[test]
    fn test_duplicate_policy_parse() {
        assert_eq!(
            DuplicatePolicy::from_config_str("Reject"),
            Some(DuplicatePolicy::Reject)
        );
        assert_eq!(
            DuplicatePolicy::from_config_str("last_writer_wins"),
            Some(DuplicatePolicy::LastWriterWins)
        );
        assert_eq!(DuplicatePolicy::from_config_str("first"), None);
        assert_eq!(DuplicatePolicy::default(), DuplicatePolicy::LastWriterWins);
    }

    #[test]
    fn test_missing_tile_has_no_data() {
        let tile = Tile::missing(TileCoord::new(1, 2, 3));
        assert!(!tile.has_data());
    }
}
