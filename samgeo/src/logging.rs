//! Logging setup.
//!
//! Installs a `tracing` subscriber writing human-readable lines to stderr
//! and, optionally, plain lines to a log file through a non-blocking
//! writer. `RUST_LOG` overrides the configured level.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Invalid log file path: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("Failed to create log directory: {0}")]
    Io(#[from] io::Error),

    #[error("Logger initialization failed: {0}")]
    Init(String),
}

/// Keeps the file writer alive; logs written after it drops may be lost.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Installs the global subscriber.
///
/// `level` is a filter directive such as `info` or `samgeo=debug,warn`.
/// Fails if a subscriber is already installed.
pub fn init(level: &str, file: Option<&Path>) -> Result<LogGuard, LoggingError> {
    let env_filter = build_filter(level)?;

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_timer(LocalTime::rfc_3339())
        .with_writer(io::stderr);

    let (file_layer, guard) = match file {
        Some(path) => {
            let (dir, name) = split_log_path(path)?;
            std::fs::create_dir_all(&dir)?;

            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_timer(LocalTime::rfc_3339())
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    Ok(LogGuard { _file: guard })
}

fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| LoggingError::InvalidFilter {
            filter: level.to_string(),
            reason: e.to_string(),
        })
}

/// Splits a log file path into its directory and file name.
fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf), LoggingError> {
    let name = path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidPath(path.to_path_buf()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, PathBuf::from(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_log_path() {
        let (dir, name) = split_log_path(Path::new("/var/log/samgeo.log")).unwrap();
        assert_eq!(dir, PathBuf::from("/var/log"));
        assert_eq!(name, PathBuf::from("samgeo.log"));
    }

    #[test]
    fn test_split_bare_file_name() {
        let (dir, name) = split_log_path(Path::new("samgeo.log")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, PathBuf::from("samgeo.log"));
    }

    #[test]
    fn test_split_rejects_directory_only() {
        assert!(matches!(
            split_log_path(Path::new("/")),
            Err(LoggingError::InvalidPath(_))
        ));
    }
}
