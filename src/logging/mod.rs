//! Tracing subscriber initialization.
//!
//! Diagnostics go to a log file so they never mix with the rendered
//! output on stdout. Follow them with `tail -f` in another terminal.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// The directory path that failed to be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid log file path (no filename component)
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Filter from `RUST_LOG`, or `default_directive` when it is unset or invalid.
pub fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Build a subscriber that appends plain-text events to `log_path`.
///
/// Creates the parent directory if needed.
///
/// # Errors
///
/// - [`LoggingError::DirectoryCreation`] if the directory cannot be created
/// - [`LoggingError::InvalidPath`] if `log_path` has no file name
pub fn file_subscriber(
    log_path: &Path,
    default_directive: &str,
) -> Result<impl tracing::Subscriber + Send + Sync + 'static, LoggingError> {
    let file_name = log_path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.clone(),
        source,
    })?;

    let file_appender = tracing_appender::rolling::never(&directory, file_name);

    Ok(tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_directive))
        .with_writer(file_appender)
        .with_ansi(false)
        .finish())
}

/// Install the file subscriber globally.
///
/// Respects `RUST_LOG`; otherwise logs at `info`, or `debug` when `verbose`.
///
/// # Errors
///
/// Returns [`LoggingError::SubscriberAlreadySet`] if called twice, or any
/// error from [`file_subscriber`].
pub fn init(log_path: &Path, verbose: bool) -> Result<(), LoggingError> {
    let directive = if verbose { "debug" } else { "info" };
    let subscriber = file_subscriber(log_path, directive)?;
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}
