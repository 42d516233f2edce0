//! CLI error type.

use std::fmt;
use std::io;

use samgeo::config::ConfigError;
use samgeo::coord::CoordError;
use samgeo::embedding::EmbeddingError;
use samgeo::logging::LoggingError;
use samgeo::mosaic::MosaicError;
use samgeo::provider::ProviderError;
use samgeo::viewport::ViewportError;

/// Errors reported by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Bad configuration or arguments
    Config(String),
    Coord(CoordError),
    Provider(ProviderError),
    Viewport(ViewportError),
    Mosaic(MosaicError),
    Embedding(EmbeddingError),
    Logging(LoggingError),
    Io(io::Error),
}

impl CliError {
    /// Prints the error and exits with status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        std::process::exit(1);
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "{}", msg),
            CliError::Coord(e) => write!(f, "Invalid coordinate: {}", e),
            CliError::Provider(e) => write!(f, "Tile provider error: {}", e),
            CliError::Viewport(e) => write!(f, "Invalid view: {}", e),
            CliError::Mosaic(e) => write!(f, "Mosaic error: {}", e),
            CliError::Embedding(e) => write!(f, "Embedding error: {}", e),
            CliError::Logging(e) => write!(f, "{}", e),
            CliError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::Coord(e) => Some(e),
            CliError::Provider(e) => Some(e),
            CliError::Viewport(e) => Some(e),
            CliError::Mosaic(e) => Some(e),
            CliError::Embedding(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Io(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Coord(e)
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Provider(e)
    }
}

impl From<ViewportError> for CliError {
    fn from(e: ViewportError) -> Self {
        CliError::Viewport(e)
    }
}

impl From<MosaicError> for CliError {
    fn from(e: MosaicError) -> Self {
        CliError::Mosaic(e)
    }
}

impl From<EmbeddingError> for CliError {
    fn from(e: EmbeddingError) -> Self {
        CliError::Embedding(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
