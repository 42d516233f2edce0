//! Georeferencing for mosaic rasters.
//!
//! A mosaic built from whole Web Mercator tiles is linear in Mercator space,
//! so pixel positions are obtained by interpolating the normalized Mercator
//! coordinates of the extent edges.

use serde::{Deserialize, Serialize};

use super::{
    lat_from_mercator_y, lng_from_mercator_x, mercator_x, mercator_y, CoordError, GeoExtent,
};

/// Pixel size and geographic extent of a raster handed to the segmentation model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoImage {
    pub extent: GeoExtent,
    pub width: u32,
    pub height: u32,
}

impl GeoImage {
    /// Creates a georeferenced image description.
    ///
    /// Fails if the raster has no pixels or the extent has no area.
    pub fn new(extent: GeoExtent, width: u32, height: u32) -> Result<Self, CoordError> {
        if width == 0 || height == 0 {
            return Err(CoordError::DegenerateImage(format!(
                "image size {}×{}",
                width, height
            )));
        }
        if extent.east <= extent.west || extent.north <= extent.south {
            return Err(CoordError::DegenerateImage(format!("extent {}", extent)));
        }
        Ok(Self {
            extent,
            width,
            height,
        })
    }

    /// Maps `(lng, lat)` to fractional image pixel coordinates `(x, y)`.
    ///
    /// `(0, 0)` is the north-west corner of the raster and `(width, height)`
    /// the south-east corner.
    pub fn lng_lat_to_image_pixel(&self, lng: f64, lat: f64) -> Result<(f64, f64), CoordError> {
        if !self.extent.contains(lng, lat) {
            return Err(CoordError::OutsideImage { lng, lat });
        }

        let (west, east) = (mercator_x(self.extent.west), mercator_x(self.extent.east));
        let (north, south) = (mercator_y(self.extent.north), mercator_y(self.extent.south));

        let x = (mercator_x(lng) - west) / (east - west) * self.width as f64;
        let y = (mercator_y(lat) - north) / (south - north) * self.height as f64;

        Ok((x, y))
    }

    /// Maps fractional image pixel coordinates back to `(lng, lat)`.
    ///
    /// Pixels outside the raster extrapolate along the same projection.
    pub fn image_pixel_to_lng_lat(&self, x: f64, y: f64) -> (f64, f64) {
        let (west, east) = (mercator_x(self.extent.west), mercator_x(self.extent.east));
        let (north, south) = (mercator_y(self.extent.north), mercator_y(self.extent.south));

        let mx = west + x / self.width as f64 * (east - west);
        let my = north + y / self.height as f64 * (south - north);

        (lng_from_mercator_x(mx), lat_from_mercator_y(my))
    }
}
