//! SAMGeo - interactive segmentation of satellite imagery
//!
//! This library assembles the map tiles visible in a viewport into one
//! georeferenced mosaic, sends it to a remote service for a SAM image
//! embedding, and turns clicks on the map into segmentation prompts whose
//! results come back as GeoJSON polygons.
//!
//! # Pipeline
//!
//! 1. [`viewport::Viewport`] lists the tiles covering the view.
//! 2. [`provider::TileFetcher`] downloads them from an XYZ tile source.
//! 3. [`mosaic::MosaicBuilder`] stitches them into one image with its extent.
//! 4. [`embedding::EmbeddingClient`] uploads the mosaic and returns the embedding.
//! 5. [`session::Session`] feeds the embedding and map clicks to a
//!    [`segment::SegmentationModel`].

pub mod config;
pub mod coord;
pub mod embedding;
pub mod logging;
pub mod mosaic;
pub mod provider;
pub mod segment;
pub mod session;
pub mod viewport;
