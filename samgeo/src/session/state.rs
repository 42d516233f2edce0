//! Session state snapshot.

use std::sync::Arc;

use image::RgbaImage;

use crate::coord::GeoImage;
use crate::embedding::Embedding;
use crate::segment::{Feature, FeatureCollection, MapInput};

/// How map interactions are turned into prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Single clicks become point prompts
    #[default]
    Click,
    /// Box selections become box prompts
    BoxSelect,
}

/// Camera position requested by the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub lng: f64,
    pub lat: f64,
    pub zoom: f64,
}

/// One segmentation produced by a map interaction.
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Georeferenced outline
    pub features: Vec<Feature>,
    /// Image cut-out of the segmented region
    pub clip: Option<Arc<RgbaImage>>,
}

/// Immutable snapshot of a segmentation session.
///
/// Produced by [`reduce`](super::reduce); never mutated in place.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub model_ready: bool,
    pub scene_ready: bool,
    /// An embedding request is in flight
    pub loading: bool,
    pub selection_mode: SelectionMode,
    pub panel_collapsed: bool,
    pub camera: Option<Camera>,
    pub last_input: Option<MapInput>,
    /// Georeferencing of the image the embedding was computed for
    pub geo_image: Option<GeoImage>,
    pub embedding: Option<Embedding>,
    pub segmentations: Vec<Segmentation>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            model_ready: false,
            scene_ready: false,
            loading: false,
            selection_mode: SelectionMode::default(),
            panel_collapsed: true,
            camera: None,
            last_input: None,
            geo_image: None,
            embedding: None,
            segmentations: Vec::new(),
        }
    }
}

impl SessionState {
    /// True once an embedding is available for click prediction.
    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some() && self.geo_image.is_some()
    }

    /// All collected outlines as one feature collection.
    pub fn polygons(&self) -> FeatureCollection {
        FeatureCollection::new(
            self.segmentations
                .iter()
                .flat_map(|s| s.features.iter().cloned())
                .collect(),
        )
    }
}
