//! Satellite imagery provider abstraction
//!
//! This module provides the HTTP client seam, tile sources that follow the
//! XYZ URL scheme, and a parallel fetcher that turns tile coordinates into
//! decoded [`Tile`](crate::mosaic::Tile)s ready for mosaicking.
//!
//! ```ignore
//! use samgeo::provider::{ReqwestClient, TileFetcher, XyzTileProvider, GOOGLE_SATELLITE_URL};
//!
//! let provider = XyzTileProvider::new(ReqwestClient::new()?, GOOGLE_SATELLITE_URL)?;
//! let tiles = TileFetcher::new(provider).fetch(&viewport.visible_tiles()?);
//! ```

mod fetcher;
mod http;
mod types;
mod xyz;

pub use fetcher::TileFetcher;
pub use http::{HttpClient, MultipartFile, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use types::{ProviderError, TileSource};
pub use xyz::{expand_template, quadkey, XyzTileProvider, GOOGLE_SATELLITE_URL};

#[cfg(test)]
pub use http::tests::MockHttpClient;
