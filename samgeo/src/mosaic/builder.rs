//! Tile mosaic assembly.

use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use tracing::{debug, warn};

use super::types::{DuplicatePolicy, GridBounds, MosaicError, Tile, DEFAULT_TILE_SIZE};
use crate::coord::{CoordError, GeoExtent, GeoImage, TileProjector, MAX_ZOOM};

/// A composited raster covering the bounding box of a tile set.
#[derive(Debug, Clone)]
pub struct Mosaic {
    /// Composited RGBA raster
    pub image: RgbaImage,
    /// Geographic extent of the raster
    pub extent: GeoExtent,
    /// Raster width in pixels
    pub width: u32,
    /// Raster height in pixels
    pub height: u32,
    /// Grid rectangle the raster covers
    pub bounds: GridBounds,
    /// Zoom level used for the extent projection
    pub zoom: u8,
}

impl Mosaic {
    /// Describes the raster for the segmentation model.
    pub fn geo_image(&self) -> Result<GeoImage, CoordError> {
        GeoImage::new(self.extent, self.width, self.height)
    }

    /// Encodes the raster as PNG, the blob uploaded for embedding.
    pub fn encode_png(&self) -> Result<Vec<u8>, MosaicError> {
        let mut buffer = Cursor::new(Vec::new());
        self.image.write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }

    /// Writes the raster as a PNG file.
    pub fn save_png(&self, path: &Path) -> Result<(), MosaicError> {
        std::fs::write(path, self.encode_png()?)?;
        Ok(())
    }
}

/// Default canvas cap: 2^28 pixels, 1 GiB of RGBA.
pub const DEFAULT_MAX_PIXELS: u64 = 1 << 28;

/// Builds mosaics from loaded tiles.
///
/// # Example
///
/// ```
/// use image::RgbaImage;
/// use samgeo::coord::WebMercator;
/// use samgeo::mosaic::{MosaicBuilder, Tile};
///
/// let tiles = vec![
///     Tile::new(2, 3, 4, RgbaImage::new(256, 256)),
///     Tile::new(3, 3, 4, RgbaImage::new(256, 256)),
/// ];
/// let mosaic = MosaicBuilder::new(256).build(&tiles, 4.0, &WebMercator).unwrap();
/// assert_eq!((mosaic.width, mosaic.height), (512, 256));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MosaicBuilder {
    tile_size: u32,
    duplicate_policy: DuplicatePolicy,
    max_pixels: u64,
}

impl Default for MosaicBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SIZE)
    }
}

impl MosaicBuilder {
    /// Creates a builder for square tiles of `tile_size` pixels.
    pub fn new(tile_size: u32) -> Self {
        Self {
            tile_size,
            duplicate_policy: DuplicatePolicy::default(),
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }

    /// Sets how tiles sharing a grid cell are handled.
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Caps the canvas area; larger mosaics fail with [`MosaicError::TooLarge`].
    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    /// Tile edge length in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Composites `tiles` into one raster and projects its extent.
    ///
    /// `zoom` is the (possibly fractional) map zoom; the extent is projected
    /// at `ceil(zoom)`.
    ///
    /// # Errors
    ///
    /// - [`MosaicError::EmptyTileSet`] when `tiles` is empty
    /// - [`MosaicError::DuplicateTile`] under [`DuplicatePolicy::Reject`]
    /// - [`MosaicError::TooLarge`] when the raster size overflows `u32` or
    ///   its area exceeds the pixel cap
    pub fn build<P>(&self, tiles: &[Tile], zoom: f64, projector: &P) -> Result<Mosaic, MosaicError>
    where
        P: TileProjector + ?Sized,
    {
        if self.tile_size == 0 {
            return Err(MosaicError::InvalidTileSize(self.tile_size));
        }
        let projection_zoom = projection_zoom(zoom)?;

        let bounds = GridBounds::from_coords(tiles.iter().map(|t| &t.coord))?;

        if self.duplicate_policy == DuplicatePolicy::Reject {
            let mut seen = HashSet::with_capacity(tiles.len());
            for tile in tiles {
                if !seen.insert((tile.coord.x, tile.coord.y)) {
                    return Err(MosaicError::DuplicateTile {
                        x: tile.coord.x,
                        y: tile.coord.y,
                    });
                }
            }
        }

        let (width, height) = self.canvas_size(&bounds)?;
        debug!(
            tiles = tiles.len(),
            columns = bounds.columns(),
            rows = bounds.rows(),
            width,
            height,
            "Compositing mosaic"
        );

        let mut image = RgbaImage::new(width, height);
        let mut mismatched_zoom = 0usize;
        for tile in tiles {
            if tile.coord.zoom != projection_zoom {
                mismatched_zoom += 1;
            }
            let Some(data) = &tile.data else {
                debug!(x = tile.coord.x, y = tile.coord.y, "Tile has no data, leaving cell blank");
                continue;
            };

            let (ox, oy) = bounds.cell_offset(tile.coord.x, tile.coord.y, self.tile_size);
            if data.dimensions() == (self.tile_size, self.tile_size) {
                imageops::replace(&mut image, data, ox as i64, oy as i64);
            } else {
                let scaled =
                    imageops::resize(data, self.tile_size, self.tile_size, FilterType::Triangle);
                imageops::replace(&mut image, &scaled, ox as i64, oy as i64);
            }
        }

        if mismatched_zoom > 0 {
            warn!(
                count = mismatched_zoom,
                zoom = projection_zoom,
                "Tiles do not match the projection zoom level"
            );
        }

        let extent = self.extent(&bounds, projection_zoom, projector)?;

        Ok(Mosaic {
            image,
            extent,
            width,
            height,
            bounds,
            zoom: projection_zoom,
        })
    }

    fn canvas_size(&self, bounds: &GridBounds) -> Result<(u32, u32), MosaicError> {
        let too_large = || MosaicError::TooLarge {
            columns: bounds.columns(),
            rows: bounds.rows(),
            tile_size: self.tile_size,
        };

        let width = bounds
            .columns()
            .checked_mul(self.tile_size as u64)
            .and_then(|w| u32::try_from(w).ok())
            .ok_or_else(too_large)?;
        let height = bounds
            .rows()
            .checked_mul(self.tile_size as u64)
            .and_then(|h| u32::try_from(h).ok())
            .ok_or_else(too_large)?;

        // Sparse tile sets can span a canvas far beyond available memory
        if width as u64 * height as u64 > self.max_pixels {
            return Err(too_large());
        }

        Ok((width, height))
    }

    fn extent<P>(&self, bounds: &GridBounds, zoom: u8, projector: &P) -> Result<GeoExtent, MosaicError>
    where
        P: TileProjector + ?Sized,
    {
        let (east_x, south_y) = bounds
            .max_x
            .checked_add(1)
            .zip(bounds.max_y.checked_add(1))
            .ok_or(MosaicError::TooLarge {
                columns: bounds.columns(),
                rows: bounds.rows(),
                tile_size: self.tile_size,
            })?;

        let south_west = projector.tile_to_lng_lat(bounds.min_x, south_y, zoom);
        let north_east = projector.tile_to_lng_lat(east_x, bounds.min_y, zoom);

        Ok(GeoExtent::from_corners(south_west, north_east))
    }
}

/// Integer zoom used for projecting grid corners.
fn projection_zoom(zoom: f64) -> Result<u8, MosaicError> {
    let ceiled = zoom.ceil();
    if !ceiled.is_finite() || ceiled < 0.0 || ceiled > MAX_ZOOM as f64 {
        return Err(MosaicError::InvalidZoom(zoom));
    }
    Ok(ceiled as u8)
}

/// Builds a mosaic with the default duplicate policy.
///
/// Shorthand for `MosaicBuilder::new(tile_size).build(tiles, zoom, projector)`.
pub fn build_mosaic<P>(
    tiles: &[Tile],
    zoom: f64,
    tile_size: u32,
    projector: &P,
) -> Result<Mosaic, MosaicError>
where
    P: TileProjector + ?Sized,
{
    MosaicBuilder::new(tile_size).build(tiles, zoom, projector)
}
