//! Map input events and their conversion to model prompts.

use serde::{Deserialize, Serialize};

use crate::coord::{CoordError, GeoExtent, GeoImage};

/// Label attached to a prompt point.
///
/// Values follow the SAM decoder convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickType {
    /// Background point
    Negative = 0,
    /// Foreground point
    Positive = 1,
    /// Top-left corner of a box prompt
    BoxTopLeft = 2,
    /// Bottom-right corner of a box prompt
    BoxBottomRight = 3,
}

impl ClickType {
    /// Numeric label passed to the decoder.
    pub fn label(self) -> f32 {
        self as u8 as f32
    }
}

/// A prompt point in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClickPoint {
    pub x: f64,
    pub y: f64,
    pub click_type: ClickType,
}

/// A user interaction on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MapInput {
    /// Single click at `(lng, lat)`
    Point { lng: f64, lat: f64 },
    /// Box selection
    Box(GeoExtent),
}

/// Converts a map input to prompt points on `image`.
///
/// A click becomes one positive point; a box becomes its top-left and
/// bottom-right corners.
pub fn prompt_points(input: &MapInput, image: &GeoImage) -> Result<Vec<ClickPoint>, CoordError> {
    match *input {
        MapInput::Point { lng, lat } => {
            let (x, y) = image.lng_lat_to_image_pixel(lng, lat)?;
            Ok(vec![ClickPoint {
                x,
                y,
                click_type: ClickType::Positive,
            }])
        }
        MapInput::Box(extent) => {
            let (x0, y0) = image.lng_lat_to_image_pixel(extent.west, extent.north)?;
            let (x1, y1) = image.lng_lat_to_image_pixel(extent.east, extent.south)?;
            Ok(vec![
                ClickPoint {
                    x: x0,
                    y: y0,
                    click_type: ClickType::BoxTopLeft,
                },
                ClickPoint {
                    x: x1,
                    y: y1,
                    click_type: ClickType::BoxBottomRight,
                },
            ])
        }
    }
}
