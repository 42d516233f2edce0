//! Image embedding computation.
//!
//! The embedding is computed server-side: the mosaic is uploaded as a PNG in
//! the multipart field `file`, and the response body is the raw embedding
//! tensor. The client does not interpret the buffer beyond optional shape
//! checks; it is handed to the segmentation model as-is.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info};

use crate::mosaic::{Mosaic, MosaicError};
use crate::provider::{HttpClient, MultipartFile, ProviderError};

/// Shape of the image embedding produced by the SAM ViT encoders.
pub const SAM_EMBEDDING_SHAPE: [usize; 4] = [1, 256, 64, 64];

/// Multipart field carrying the image.
pub const UPLOAD_FIELD: &str = "file";

/// Errors raised while computing or loading an embedding.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Failed to encode mosaic: {0}")]
    Mosaic(#[from] MosaicError),

    #[error("Embedding request failed: {0}")]
    Request(#[from] ProviderError),

    #[error("Embedding service returned an empty body")]
    EmptyResponse,

    #[error("Embedding file is empty: {}", .0.display())]
    EmptyFile(PathBuf),

    #[error("Embedding length {0} is not a whole number of f32 values")]
    InvalidLength(usize),

    #[error("Embedding has {actual} values, expected {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A precomputed image embedding as returned by the embedding service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embedding {
    data: Bytes,
}

impl Embedding {
    /// Wraps a raw embedding buffer.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Raw buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Size of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Interprets the buffer as little-endian `f32` values.
    pub fn to_f32_vec(&self) -> Result<Vec<f32>, EmbeddingError> {
        if self.data.len() % 4 != 0 {
            return Err(EmbeddingError::InvalidLength(self.data.len()));
        }
        Ok(self
            .data
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    /// Checks that the buffer holds exactly `shape.iter().product()` `f32` values.
    pub fn check_shape(&self, shape: &[usize]) -> Result<(), EmbeddingError> {
        if self.data.len() % 4 != 0 {
            return Err(EmbeddingError::InvalidLength(self.data.len()));
        }
        let expected: usize = shape.iter().product();
        let actual = self.data.len() / 4;
        if expected != actual {
            return Err(EmbeddingError::ShapeMismatch { expected, actual });
        }
        Ok(())
    }

    /// Writes the raw buffer to `path`.
    pub fn save(&self, path: &Path) -> Result<(), EmbeddingError> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }

    /// Reads a raw buffer previously written with [`Embedding::save`].
    pub fn load(path: &Path) -> Result<Self, EmbeddingError> {
        let data = std::fs::read(path)?;
        if data.is_empty() {
            return Err(EmbeddingError::EmptyFile(path.to_path_buf()));
        }
        Ok(Self::from_bytes(data))
    }
}

/// Client for the embedding HTTP endpoint.
pub struct EmbeddingClient<C: HttpClient> {
    http_client: C,
    url: String,
}

impl<C: HttpClient> EmbeddingClient<C> {
    /// Creates a client posting to `url`.
    pub fn new(http_client: C, url: impl Into<String>) -> Self {
        Self {
            http_client,
            url: url.into(),
        }
    }

    /// Endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Uploads the mosaic and returns the embedding.
    ///
    /// There is no retry; any failure is returned to the caller.
    pub fn compute(&self, mosaic: &Mosaic) -> Result<Embedding, EmbeddingError> {
        let png = mosaic.encode_png()?;
        debug!(
            url = %self.url,
            width = mosaic.width,
            height = mosaic.height,
            bytes = png.len(),
            "Uploading mosaic for embedding"
        );
        self.compute_png(png)
    }

    /// Uploads an already encoded PNG and returns the embedding.
    pub fn compute_png(&self, png: Vec<u8>) -> Result<Embedding, EmbeddingError> {
        let file = MultipartFile::png(UPLOAD_FIELD, "mosaic.png", png);
        let body = self.http_client.post_multipart(&self.url, file)?;
        if body.is_empty() {
            return Err(EmbeddingError::EmptyResponse);
        }

        info!(bytes = body.len(), "Embedding computed");
        Ok(Embedding::from_bytes(body))
    }
}
