//! Parallel tile download and decode.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::coord::TileCoord;
use crate::mosaic::Tile;
use crate::provider::{ProviderError, TileSource};

/// Downloads tiles from a [`TileSource`] and decodes them into rasters.
pub struct TileFetcher<S: TileSource> {
    source: S,
}

impl<S: TileSource> TileFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// The underlying tile source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches every tile in `coords`, preserving order.
    ///
    /// A tile that fails to download or decode is returned without imagery
    /// and renders as a blank mosaic cell.
    pub fn fetch(&self, coords: &[TileCoord]) -> Vec<Tile> {
        self.fetch_with_progress(coords, |_, _| {})
    }

    /// Like [`TileFetcher::fetch`], calling `on_tile(coord, loaded)` as each
    /// tile finishes. The callback runs on worker threads.
    pub fn fetch_with_progress<F>(&self, coords: &[TileCoord], on_tile: F) -> Vec<Tile>
    where
        F: Fn(&TileCoord, bool) + Sync,
    {
        debug!(
            provider = self.source.name(),
            tiles = coords.len(),
            "Fetching tiles"
        );

        let tiles: Vec<Tile> = coords
            .par_iter()
            .map(|coord| {
                let tile = match self.fetch_one(coord) {
                    Ok(tile) => tile,
                    Err(e) => {
                        warn!(tile = %coord, error = %e, "Tile unavailable, leaving cell blank");
                        Tile::missing(*coord)
                    }
                };
                on_tile(coord, tile.has_data());
                tile
            })
            .collect();

        let failed = tiles.iter().filter(|t| !t.has_data()).count();
        debug!(loaded = tiles.len() - failed, failed, "Tile fetch complete");
        tiles
    }

    /// Downloads and decodes a single tile.
    pub fn fetch_one(&self, coord: &TileCoord) -> Result<Tile, ProviderError> {
        let bytes = self.source.download_tile(coord)?;
        let image = image::load_from_memory(&bytes).map_err(|e| ProviderError::Decode {
            tile: *coord,
            reason: e.to_string(),
        })?;

        Ok(Tile {
            coord: *coord,
            data: Some(image.into_rgba8()),
        })
    }
}
