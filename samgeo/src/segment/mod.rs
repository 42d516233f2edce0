//! Segmentation model collaborator.
//!
//! The model itself (prompt encoder and mask decoder) is an external black
//! box. [`SegmentationModel`] captures the calls the session makes on it:
//!
//! ```text
//! set_geo_image ─► set_embedding ─► predict_by_points ─┬─► export_geo_polygon
//!                                                      └─► export_image_clip
//! ```

mod geojson;
mod prompt;

pub use geojson::{Feature, FeatureCollection, Geometry};
pub use prompt::{prompt_points, ClickPoint, ClickType, MapInput};

use image::RgbaImage;
use thiserror::Error;

use crate::coord::{CoordError, GeoImage};
use crate::embedding::Embedding;

/// Errors reported by a segmentation model.
#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("No image has been set on the model")]
    NoImage,

    #[error("No embedding has been set on the model")]
    NoEmbedding,

    #[error(transparent)]
    Coord(#[from] CoordError),

    /// Failure inside the model implementation.
    #[error("Model error: {0}")]
    Model(String),
}

/// Point-prompted segmentation over a georeferenced image.
pub trait SegmentationModel {
    /// Opaque result of a prediction (typically a mask).
    type Prediction;

    /// Sets the image prompts refer to, with its georeferencing.
    fn set_geo_image(&mut self, image: &RgbaImage, geo: GeoImage) -> Result<(), SegmentError>;

    /// Sets the precomputed embedding of the current image.
    fn set_embedding(&mut self, embedding: Embedding) -> Result<(), SegmentError>;

    /// Predicts a mask from prompt points in image pixel space.
    fn predict_by_points(&self, points: &[ClickPoint]) -> Result<Self::Prediction, SegmentError>;

    /// Traces a prediction into georeferenced polygons tagged with `class_id`.
    fn export_geo_polygon(
        &self,
        prediction: &Self::Prediction,
        class_id: u32,
    ) -> Result<FeatureCollection, SegmentError>;

    /// Cuts the predicted region out of the current image.
    fn export_image_clip(&self, prediction: &Self::Prediction) -> Result<RgbaImage, SegmentError>;
}
