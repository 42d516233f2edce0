//! Pure state transitions.

use super::state::{Camera, Segmentation, SelectionMode, SessionState};
use crate::coord::GeoImage;
use crate::embedding::Embedding;
use crate::segment::MapInput;

/// Events that change the session state.
#[derive(Debug, Clone)]
pub enum Action {
    ModelReady,
    SceneReady,
    SelectionModeChanged(SelectionMode),
    PanelToggled,
    CameraMoved(Camera),
    EmbeddingRequested,
    EmbeddingReady {
        geo_image: GeoImage,
        embedding: Embedding,
    },
    EmbeddingFailed,
    /// The model no longer matches the stored embedding
    EmbeddingInvalidated,
    MapClicked(MapInput),
    SegmentationAdded(Segmentation),
    SegmentationsCleared,
}

/// Returns the state that follows `state` after `action`.
///
/// A failed embedding only clears the loading flag; the previous image and
/// embedding stay usable.
pub fn reduce(state: &SessionState, action: Action) -> SessionState {
    let mut next = state.clone();
    match action {
        Action::ModelReady => next.model_ready = true,
        Action::SceneReady => next.scene_ready = true,
        Action::SelectionModeChanged(mode) => next.selection_mode = mode,
        Action::PanelToggled => next.panel_collapsed = !state.panel_collapsed,
        Action::CameraMoved(camera) => next.camera = Some(camera),
        Action::EmbeddingRequested => next.loading = true,
        Action::EmbeddingReady {
            geo_image,
            embedding,
        } => {
            next.loading = false;
            next.geo_image = Some(geo_image);
            next.embedding = Some(embedding);
        }
        Action::EmbeddingFailed => next.loading = false,
        Action::EmbeddingInvalidated => {
            next.geo_image = None;
            next.embedding = None;
        }
        Action::MapClicked(input) => next.last_input = Some(input),
        Action::SegmentationAdded(segmentation) => next.segmentations.push(segmentation),
        Action::SegmentationsCleared => next.segmentations.clear(),
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::GeoExtent;
    use crate::segment::{Feature, Geometry};

    fn geo_image() -> GeoImage {
        GeoImage::new(GeoExtent::new(0.0, 0.0, 1.0, 1.0), 256, 256).unwrap()
    }

    fn segmentation(n: usize) -> Segmentation {
        let feature = Feature {
            geometry: Geometry::Polygon {
                coordinates: vec![vec![[0.0, 0.0]; 4]],
            },
            properties: Default::default(),
        };
        Segmentation {
            features: vec![feature; n],
            clip: None,
        }
    }

    #[test]
    fn test_initial_state() {
        let state = SessionState::default();
        assert!(!state.loading);
        assert!(state.panel_collapsed);
        assert_eq!(state.selection_mode, SelectionMode::Click);
        assert!(!state.has_embedding());
    }

    #[test]
    fn test_reduce_does_not_mutate_input() {
        let state = SessionState::default();
        let next = reduce(&state, Action::EmbeddingRequested);
        assert!(next.loading);
        assert!(!state.loading);
    }

    #[test]
    fn test_embedding_lifecycle() {
        let state = reduce(&SessionState::default(), Action::EmbeddingRequested);
        let state = reduce(
            &state,
            Action::EmbeddingReady {
                geo_image: geo_image(),
                embedding: Embedding::from_bytes(vec![1u8, 2, 3, 4]),
            },
        );

        assert!(!state.loading);
        assert!(state.has_embedding());
    }

    #[test]
    fn test_failed_embedding_keeps_previous() {
        let state = reduce(
            &SessionState::default(),
            Action::EmbeddingReady {
                geo_image: geo_image(),
                embedding: Embedding::from_bytes(vec![7u8; 4]),
            },
        );
        let state = reduce(&state, Action::EmbeddingRequested);
        let state = reduce(&state, Action::EmbeddingFailed);

        assert!(!state.loading);
        assert_eq!(state.embedding.unwrap().as_bytes(), &[7u8; 4]);
    }

    #[test]
    fn test_invalidated_embedding_is_cleared() {
        let state = reduce(
            &SessionState::default(),
            Action::EmbeddingReady {
                geo_image: geo_image(),
                embedding: Embedding::from_bytes(vec![7u8; 4]),
            },
        );
        let state = reduce(&state, Action::EmbeddingInvalidated);

        assert!(!state.has_embedding());
        assert!(state.geo_image.is_none());
    }

    #[test]
    fn test_panel_toggle() {
        let state = reduce(&SessionState::default(), Action::PanelToggled);
        assert!(!state.panel_collapsed);
        let state = reduce(&state, Action::PanelToggled);
        assert!(state.panel_collapsed);
    }

    #[test]
    fn test_segmentations_accumulate_into_polygons() {
        let state = reduce(&SessionState::default(), Action::SegmentationAdded(segmentation(2)));
        let state = reduce(&state, Action::SegmentationAdded(segmentation(1)));

        assert_eq!(state.segmentations.len(), 2);
        assert_eq!(state.polygons().features.len(), 3);

        let state = reduce(&state, Action::SegmentationsCleared);
        assert!(state.polygons().is_empty());
    }

    #[test]
    fn test_selection_mode_and_camera() {
        let state = reduce(
            &SessionState::default(),
            Action::SelectionModeChanged(SelectionMode::BoxSelect),
        );
        let state = reduce(
            &state,
            Action::CameraMoved(Camera {
                lng: 120.1,
                lat: 30.2,
                zoom: 17.0,
            }),
        );
        assert_eq!(state.selection_mode, SelectionMode::BoxSelect);
        assert_eq!(state.camera.unwrap().zoom, 17.0);
    }
}
