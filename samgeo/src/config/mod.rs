//! User configuration.
//!
//! Settings live in an INI file (see [`config_file_path`]) with one section
//! per concern:
//!
//! ```ini
//! [map]
//! zoom = 17
//! center_lat = 30.261061158180482
//! center_lon = 120.10533489408249
//!
//! [provider]
//! tile_url = https://mt{s}.google.com/vt/lyrs=s&x={x}&y={y}&z={z}
//!
//! [embedding]
//! url = http://localhost:8000/embedding
//!
//! [locations]
//! hangzhou = 30.261061158180482,120.10533489408249,17
//! ```
//!
//! Individual settings are addressed as `section.key` through [`ConfigKey`].

mod file;
mod keys;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use file::{
    config_file_path, ConfigFile, EmbeddingSettings, Location, LoggingSettings, MapSettings,
    MosaicSettings, ProviderSettings, CONFIG_PATH_ENV, DEFAULT_CENTER, DEFAULT_ZOOM,
};
pub use keys::ConfigKey;

/// Errors reading or writing the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("Unknown location '{0}'")]
    UnknownLocation(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
