//! XYZ (slippy map) tile provider.
//!
//! Serves tiles from any server that follows the `{z}/{x}/{y}` URL scheme,
//! such as Google satellite, Esri World Imagery or OpenStreetMap.
//!
//! # Template placeholders
//!
//! - `{x}`, `{y}`, `{z}`: Web Mercator tile column, row and zoom
//! - `{s}`: server index `0..=3`, spread by `(x + y) % 4`
//! - `{q}`: Bing-style quadkey, usable instead of `{x}/{y}/{z}`

use crate::coord::{TileCoord, MAX_ZOOM};
use crate::provider::{HttpClient, ProviderError, TileSource};

/// Google satellite imagery via the public tile servers.
pub const GOOGLE_SATELLITE_URL: &str = "https://mt{s}.google.com/vt/lyrs=s&x={x}&y={y}&z={z}";

/// Converts a tile coordinate to a Bing Maps quadkey.
pub fn quadkey(tile: &TileCoord) -> String {
    (1..=tile.zoom)
        .rev()
        .map(|level| {
            let mask = 1u32 << (level - 1);
            let mut digit = b'0';
            if tile.x & mask != 0 {
                digit += 1;
            }
            if tile.y & mask != 0 {
                digit += 2;
            }
            digit as char
        })
        .collect()
}

/// Tile provider driven by a URL template.
pub struct XyzTileProvider<C: HttpClient> {
    http_client: C,
    template: String,
    name: String,
    min_zoom: u8,
    max_zoom: u8,
}

impl<C: HttpClient> XyzTileProvider<C> {
    /// Creates a provider for `template`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidTemplate`] if the template carries
    /// neither `{x}`, `{y}` and `{z}` nor `{q}`.
    pub fn new(http_client: C, template: impl Into<String>) -> Result<Self, ProviderError> {
        let template = template.into();
        let has_xyz = ["{x}", "{y}", "{z}"].iter().all(|p| template.contains(p));
        if !has_xyz && !template.contains("{q}") {
            return Err(ProviderError::InvalidTemplate(template));
        }

        Ok(Self {
            http_client,
            name: host_name(&template).unwrap_or("XYZ").to_string(),
            template,
            min_zoom: 0,
            max_zoom: MAX_ZOOM,
        })
    }

    /// Restricts the zoom range served by this provider.
    pub fn with_zoom_range(mut self, min_zoom: u8, max_zoom: u8) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    /// Overrides the provider name shown in logs.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builds the tile URL for the given coordinates.
    pub fn build_url(&self, tile: &TileCoord) -> String {
        expand_template(&self.template, tile)
    }
}

/// Fills an XYZ URL template for `tile`.
///
/// `{s}` spreads requests over servers 0-3, `{q}` is the Bing-style quadkey.
pub fn expand_template(template: &str, tile: &TileCoord) -> String {
    let mut url = template
        .replace("{x}", &tile.x.to_string())
        .replace("{y}", &tile.y.to_string())
        .replace("{z}", &tile.zoom.to_string());
    if url.contains("{s}") {
        let server = (tile.x as u64 + tile.y as u64) % 4;
        url = url.replace("{s}", &server.to_string());
    }
    if url.contains("{q}") {
        url = url.replace("{q}", &quadkey(tile));
    }
    url
}

impl<C: HttpClient> TileSource for XyzTileProvider<C> {
    fn download_tile(&self, tile: &TileCoord) -> Result<Vec<u8>, ProviderError> {
        if !self.supports_zoom(tile.zoom) {
            return Err(ProviderError::UnsupportedZoom(tile.zoom));
        }

        let url = self.build_url(tile);
        self.http_client.get(&url)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn min_zoom(&self) -> u8 {
        self.min_zoom
    }

    fn max_zoom(&self) -> u8 {
        self.max_zoom
    }
}

/// Extracts the host part of a URL template.
fn host_name(template: &str) -> Option<&str> {
    let rest = template.split_once("://")?.1;
    rest.split(['/', '?']).next().filter(|h| !h.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockHttpClient;

    fn provider(template: &str) -> XyzTileProvider<MockHttpClient> {
        XyzTileProvider::new(MockHttpClient::new(Ok(vec![])), template).unwrap()
    }

    #[test]
    fn test_build_url_xyz() {
        let p = provider("https://tiles.example.com/{z}/{x}/{y}.png");
        let url = p.build_url(&TileCoord::new(109_265, 53_975, 17));
        assert_eq!(url, "https://tiles.example.com/17/109265/53975.png");
    }

    #[test]
    fn test_expand_template_without_provider() {
        let tile = TileCoord::new(3, 5, 3);
        assert_eq!(
            expand_template("https://t{s}.example.com/{q}?z={z}", &tile),
            "https://t0.example.com/213?z=3"
        );
        assert_eq!(
            expand_template("https://tiles.example.com/static.png", &tile),
            "https://tiles.example.com/static.png"
        );
    }

    #[test]
    fn test_build_url_server_rotation() {
        let p = provider(GOOGLE_SATELLITE_URL);
        assert_eq!(
            p.build_url(&TileCoord::new(1, 2, 3)),
            "https://mt3.google.com/vt/lyrs=s&x=1&y=2&z=3"
        );
        assert_eq!(
            p.build_url(&TileCoord::new(2, 2, 3)),
            "https://mt0.google.com/vt/lyrs=s&x=2&y=2&z=3"
        );
    }

    #[test]
    fn test_build_url_quadkey() {
        let p = provider("https://ecn.t0.tiles.virtualearth.net/tiles/a{q}.jpeg?g=1");
        assert_eq!(
            p.build_url(&TileCoord::new(3, 5, 3)),
            "https://ecn.t0.tiles.virtualearth.net/tiles/a213.jpeg?g=1"
        );
    }

    #[test]
    fn test_quadkey_values() {
        assert_eq!(quadkey(&TileCoord::new(0, 0, 0)), "");
        assert_eq!(quadkey(&TileCoord::new(1, 0, 1)), "1");
        assert_eq!(quadkey(&TileCoord::new(3, 5, 3)), "213");
    }

    #[test]
    fn test_invalid_template_rejected() {
        let result = XyzTileProvider::new(
            MockHttpClient::new(Ok(vec![])),
            "https://example.com/{z}/{x}.png",
        );
        assert!(matches!(result, Err(ProviderError::InvalidTemplate(_))));
    }

    #[test]
    fn test_provider_name_from_host() {
        let p = provider("https://tiles.example.com/{z}/{x}/{y}.png");
        assert_eq!(p.name(), "tiles.example.com");
        assert_eq!(p.with_name("Example").name(), "Example");
    }

    #[test]
    fn test_unsupported_zoom() {
        let p = provider("https://tiles.example.com/{z}/{x}/{y}.png").with_zoom_range(3, 19);
        let result = p.download_tile(&TileCoord::new(0, 0, 2));
        assert!(matches!(result, Err(ProviderError::UnsupportedZoom(2))));
    }

    #[test]
    fn test_download_requests_built_url() {
        let p = provider("https://tiles.example.com/{z}/{x}/{y}.png");
        p.download_tile(&TileCoord::new(4, 5, 6)).unwrap();
        let requests = p.http_client.requests.lock().unwrap();
        assert_eq!(requests[0], "https://tiles.example.com/6/4/5.png");
    }
}
