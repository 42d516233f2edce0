//! Session controller driving the model through the reducer.

use std::sync::Arc;

use image::RgbaImage;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::reducer::{reduce, Action};
use super::state::{Segmentation, SessionState};
use crate::coord::{CoordError, GeoImage, TileProjector};
use crate::embedding::{Embedding, EmbeddingClient, EmbeddingError};
use crate::mosaic::{Mosaic, MosaicBuilder, MosaicError, Tile};
use crate::provider::HttpClient;
use crate::segment::{prompt_points, MapInput, SegmentError, SegmentationModel};

/// Class id attached to polygons produced by clicks.
pub const DEFAULT_CLASS_ID: u32 = 1;

/// Errors surfaced to the user by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A click arrived before any embedding was generated.
    #[error("Please generate the embedding first")]
    EmbeddingMissing,

    #[error(transparent)]
    Mosaic(#[from] MosaicError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Segment(#[from] SegmentError),

    #[error(transparent)]
    Coord(#[from] CoordError),
}

/// A segmentation session over one model.
pub struct Session<M: SegmentationModel> {
    model: M,
    builder: MosaicBuilder,
    state: SessionState,
    /// Raster the model currently holds, kept to restore it after a failed load
    image: Option<RgbaImage>,
}

impl<M: SegmentationModel> Session<M> {
    /// Starts a session around an initialized model.
    pub fn new(model: M, builder: MosaicBuilder) -> Self {
        Self {
            model,
            builder,
            state: reduce(&SessionState::default(), Action::ModelReady),
            image: None,
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Applies an action to the state.
    pub fn dispatch(&mut self, action: Action) {
        self.state = reduce(&self.state, action);
    }

    /// Builds a mosaic from `tiles`, computes its embedding and loads both
    /// into the model.
    ///
    /// On failure the previous image and embedding stay in place, both in
    /// the session state and in the model.
    pub fn generate_embedding<C, P>(
        &mut self,
        tiles: &[Tile],
        zoom: f64,
        projector: &P,
        client: &EmbeddingClient<C>,
    ) -> Result<Mosaic, SessionError>
    where
        C: HttpClient,
        P: TileProjector + ?Sized,
    {
        self.dispatch(Action::EmbeddingRequested);

        match self.load_embedding(tiles, zoom, projector, client) {
            Ok(mosaic) => {
                info!(
                    width = mosaic.width,
                    height = mosaic.height,
                    extent = %mosaic.extent,
                    "Embedding ready"
                );
                Ok(mosaic)
            }
            Err(e) => {
                warn!(error = %e, "Embedding generation failed");
                self.dispatch(Action::EmbeddingFailed);
                Err(e)
            }
        }
    }

    fn load_embedding<C, P>(
        &mut self,
        tiles: &[Tile],
        zoom: f64,
        projector: &P,
        client: &EmbeddingClient<C>,
    ) -> Result<Mosaic, SessionError>
    where
        C: HttpClient,
        P: TileProjector + ?Sized,
    {
        let mosaic = self.builder.build(tiles, zoom, projector)?;
        let geo_image = mosaic.geo_image()?;
        let embedding = client.compute(&mosaic)?;

        // The model only sees the new image once its embedding exists
        if let Err(e) = load_scene(&mut self.model, &mosaic.image, geo_image, embedding.clone()) {
            self.restore_scene();
            return Err(e.into());
        }

        self.image = Some(mosaic.image.clone());
        self.dispatch(Action::EmbeddingReady {
            geo_image,
            embedding,
        });
        Ok(mosaic)
    }

    /// Puts the last good image and embedding back into the model after a
    /// partial load. If that fails too, the session forgets its embedding so
    /// clicks are refused instead of mixing two images.
    fn restore_scene(&mut self) {
        let restored = match (&self.image, self.state.geo_image, &self.state.embedding) {
            (Some(image), Some(geo_image), Some(embedding)) => {
                load_scene(&mut self.model, image, geo_image, embedding.clone())
            }
            _ => return,
        };

        if let Err(e) = restored {
            error!(error = %e, "Failed to restore previous embedding, discarding it");
            self.image = None;
            self.dispatch(Action::EmbeddingInvalidated);
        } else {
            debug!("Restored previous embedding");
        }
    }

    /// Segments the region under a map interaction and records the result.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmbeddingMissing`] when no embedding has been
    /// generated yet; the state is left untouched in that case.
    pub fn click(&mut self, input: MapInput) -> Result<&Segmentation, SessionError> {
        let geo_image = match self.state.geo_image {
            Some(geo) if self.state.has_embedding() => geo,
            _ => return Err(SessionError::EmbeddingMissing),
        };
        self.dispatch(Action::MapClicked(input));

        let points = prompt_points(&input, &geo_image)?;
        debug!(points = points.len(), "Predicting mask");

        let prediction = self.model.predict_by_points(&points)?;
        let polygons = self
            .model
            .export_geo_polygon(&prediction, DEFAULT_CLASS_ID)?;
        let clip = self.model.export_image_clip(&prediction)?;

        self.dispatch(Action::SegmentationAdded(Segmentation {
            features: polygons.features,
            clip: Some(Arc::new(clip)),
        }));

        self.state
            .segmentations
            .last()
            .ok_or(SessionError::Segment(SegmentError::Model(
                "segmentation was not recorded".to_string(),
            )))
    }
}

/// Hands an image and its embedding to the model, image first.
fn load_scene<M: SegmentationModel>(
    model: &mut M,
    image: &RgbaImage,
    geo_image: GeoImage,
    embedding: Embedding,
) -> Result<(), SegmentError> {
    model.set_geo_image(image, geo_image)?;
    model.set_embedding(embedding)
}
