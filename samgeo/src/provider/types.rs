//! Provider trait and errors.

use thiserror::Error;

use crate::coord::TileCoord;

/// Errors raised while talking to imagery or embedding servers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Unsupported zoom level: {0}")]
    UnsupportedZoom(u8),

    #[error("Invalid URL template: {0}")]
    InvalidTemplate(String),

    #[error("Failed to decode tile {tile}: {reason}")]
    Decode { tile: TileCoord, reason: String },
}

/// A source of raster map tiles.
///
/// Implementations must be thread-safe; tiles are downloaded in parallel.
pub trait TileSource: Send + Sync {
    /// Downloads the encoded image (PNG/JPEG) for one tile.
    fn download_tile(&self, tile: &TileCoord) -> Result<Vec<u8>, ProviderError>;

    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Lowest zoom level served.
    fn min_zoom(&self) -> u8;

    /// Highest zoom level served.
    fn max_zoom(&self) -> u8;

    /// Returns true if the provider serves tiles at `zoom`.
    fn supports_zoom(&self, zoom: u8) -> bool {
        (self.min_zoom()..=self.max_zoom()).contains(&zoom)
    }
}
