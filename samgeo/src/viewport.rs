//! Visible tile calculation for a map view.
//!
//! A map engine keeps the tiles covering its current camera loaded. This
//! module reproduces that tile set from the camera parameters so mosaics can
//! be built without a rendering engine.

use thiserror::Error;

use crate::coord::{lng_lat_to_tile, mercator_x, mercator_y, CoordError, TileCoord, MAX_ZOOM};
use crate::mosaic::DEFAULT_TILE_SIZE;

/// Errors raised when computing the visible tiles.
#[derive(Debug, Error)]
pub enum ViewportError {
    #[error(transparent)]
    Coord(#[from] CoordError),

    #[error("Invalid zoom level: {0}")]
    InvalidZoom(f64),

    #[error("Viewport has no area: {width}×{height}px")]
    Empty { width: u32, height: u32 },
}

/// Camera state of a map view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center_lng: f64,
    pub center_lat: f64,
    /// Fractional map zoom
    pub zoom: f64,
    pub width_px: u32,
    pub height_px: u32,
    pub tile_size: u32,
}

impl Viewport {
    /// Default view size in CSS pixels.
    pub const DEFAULT_WIDTH: u32 = 1024;
    pub const DEFAULT_HEIGHT: u32 = 768;

    /// Creates a viewport of the default size centered on `(lng, lat)`.
    pub fn new(center_lng: f64, center_lat: f64, zoom: f64) -> Self {
        Self {
            center_lng,
            center_lat,
            zoom,
            width_px: Self::DEFAULT_WIDTH,
            height_px: Self::DEFAULT_HEIGHT,
            tile_size: DEFAULT_TILE_SIZE,
        }
    }

    /// Sets the view size in pixels.
    pub fn with_size(mut self, width_px: u32, height_px: u32) -> Self {
        self.width_px = width_px;
        self.height_px = height_px;
        self
    }

    /// Sets the tile edge length in pixels.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Integer zoom level of the tiles drawn at this view's zoom.
    pub fn tile_zoom(&self) -> Result<u8, ViewportError> {
        let ceiled = self.zoom.ceil();
        if !ceiled.is_finite() || ceiled < 0.0 || ceiled > MAX_ZOOM as f64 {
            return Err(ViewportError::InvalidZoom(self.zoom));
        }
        Ok(ceiled as u8)
    }

    /// Lists the tiles intersecting the view in row-major order.
    ///
    /// Tiles are taken at [`Viewport::tile_zoom`] and clamped to the world
    /// grid; the view does not wrap across the antimeridian.
    pub fn visible_tiles(&self) -> Result<Vec<TileCoord>, ViewportError> {
        if self.width_px == 0 || self.height_px == 0 || self.tile_size == 0 {
            return Err(ViewportError::Empty {
                width: self.width_px,
                height: self.height_px,
            });
        }
        let zoom = self.tile_zoom()?;
        // Validates the center
        lng_lat_to_tile(self.center_lng, self.center_lat, zoom)?;

        let tile_size = self.tile_size as f64;
        let grid = 1u64 << zoom;
        let world_px = grid as f64 * tile_size;

        // Tiles from the next zoom level are drawn shrunk by this factor
        let scale = 2f64.powf(zoom as f64 - self.zoom);
        let half_w = self.width_px as f64 / 2.0 * scale;
        let half_h = self.height_px as f64 / 2.0 * scale;

        let cx = mercator_x(self.center_lng) * world_px;
        let cy = mercator_y(self.center_lat) * world_px;

        let span = |center: f64, half: f64| -> (u32, u32) {
            let first = ((center - half) / tile_size).floor().max(0.0) as u64;
            let last = (((center + half) / tile_size).ceil() as u64)
                .saturating_sub(1)
                .min(grid - 1);
            (first.min(grid - 1) as u32, last.max(first.min(grid - 1)) as u32)
        };

        let (min_x, max_x) = span(cx, half_w);
        let (min_y, max_y) = span(cy, half_h);

        let tiles = (min_y..=max_y)
            .flat_map(|y| (min_x..=max_x).map(move |x| TileCoord::new(x, y, zoom)))
            .collect();
        Ok(tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_view_covers_four_tiles() {
        let view = Viewport::new(0.0, 0.0, 2.0).with_size(512, 512);
        let tiles = view.visible_tiles().unwrap();
        assert_eq!(
            tiles,
            vec![
                TileCoord::new(1, 1, 2),
                TileCoord::new(2, 1, 2),
                TileCoord::new(1, 2, 2),
                TileCoord::new(2, 2, 2),
            ]
        );
    }

    #[test]
    fn test_fractional_zoom_uses_next_level() {
        let view = Viewport::new(0.0, 0.0, 1.5).with_size(512, 512);
        assert_eq!(view.tile_zoom().unwrap(), 2);
        let tiles = view.visible_tiles().unwrap();
        assert_eq!(tiles.len(), 16);
        assert!(tiles.iter().all(|t| t.zoom == 2));
    }

    #[test]
    fn test_view_clamped_to_world() {
        let view = Viewport::new(0.0, 0.0, 0.0).with_size(4096, 4096);
        assert_eq!(view.visible_tiles().unwrap(), vec![TileCoord::new(0, 0, 0)]);
    }

    #[test]
    fn test_view_at_west_edge() {
        let view = Viewport::new(-180.0, 0.0, 3.0).with_size(256, 256);
        let tiles = view.visible_tiles().unwrap();
        assert!(tiles.iter().all(|t| t.x == 0));
        assert_eq!(tiles.len(), 2);
    }

    #[test]
    fn test_tiles_are_row_major() {
        let view = Viewport::new(120.105, 30.261, 17.0);
        let tiles = view.visible_tiles().unwrap();
        for pair in tiles.windows(2) {
            assert!((pair[0].y, pair[0].x) < (pair[1].y, pair[1].x));
        }
    }

    #[test]
    fn test_empty_view_rejected() {
        let view = Viewport::new(0.0, 0.0, 2.0).with_size(0, 100);
        assert!(matches!(
            view.visible_tiles(),
            Err(ViewportError::Empty { .. })
        ));
    }

    #[test]
    fn test_invalid_center_rejected() {
        let view = Viewport::new(0.0, 89.0, 2.0);
        assert!(matches!(
            view.visible_tiles(),
            Err(ViewportError::Coord(CoordError::InvalidLatitude(_)))
        ));
    }

    #[test]
    fn test_invalid_zoom_rejected() {
        let view = Viewport::new(0.0, 0.0, 25.0);
        assert!(matches!(
            view.visible_tiles(),
            Err(ViewportError::InvalidZoom(_))
        ));
    }
}
