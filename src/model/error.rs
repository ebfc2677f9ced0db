//! Error types for runlog.
//!
//! The view model itself is total and has no error paths. Errors only arise
//! at the edges: reading input, decoding run-log lines, loading config and
//! installing the tracing subscriber.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned by the binary's main logic
//!   - [`InputError`] - Log file/stdin reading failures
//!   - [`DecodeError`] - Malformed run-log lines (non-fatal, logged and skipped)
//!   - [`ConfigError`](crate::config::ConfigError) - Config file failures
//!   - [`LoggingError`](crate::logging::LoggingError) - Tracing setup failures
//!   - `std::io::Error` - Writing output failed
//!
//! Decode errors are **non-fatal**: the host logs them with `tracing::warn!`
//! and continues with the next line, so a truncated log still renders.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all failure modes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read input from file or stdin.
    #[error("Failed to read input: {0}")]
    InputRead(#[from] InputError),

    /// A run-log line could not be decoded.
    ///
    /// Only surfaces when a caller chooses to treat decoding as fatal; the
    /// host itself skips such lines.
    #[error("Failed to decode log line: {0}")]
    Decode(#[from] DecodeError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Tracing could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Writing rendered output failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors encountered when reading log input from files or stdin.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified log file does not exist at the given path.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use runlog::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.log")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.log"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The filesystem path that was not found.
        path: PathBuf,
    },

    /// No file was given and stdin is an interactive terminal.
    #[error("No input source: provide a file path or pipe data to stdin")]
    NoInput,

    /// Generic I/O error reading from input source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors encountered when decoding a single run-log line.
///
/// All variants carry the 1-based line number so the warning that is
/// logged points at the offending line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The line has no `<TYPE> <message>` separator.
    ///
    /// # Examples
    ///
    /// ```
    /// use runlog::model::error::DecodeError;
    ///
    /// let err = DecodeError::MalformedLine { line: 3, content: "SR".to_string() };
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    #[error("Malformed line {line}: {content:?}")]
    MalformedLine {
        /// 1-based line number.
        line: usize,
        /// The raw line.
        content: String,
    },

    /// The message type prefix is not one the decoder knows.
    #[error("Unknown message type '{message_type}' at line {line}")]
    UnknownMessageType {
        /// 1-based line number.
        line: usize,
        /// The unrecognized prefix.
        message_type: String,
    },

    /// A memo (`M`) line could not be parsed.
    #[error("Invalid memo at line {line}: {reason}")]
    InvalidMemo {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
}

impl DecodeError {
    /// Line number the error refers to.
    pub fn line(&self) -> usize {
        match self {
            DecodeError::MalformedLine { line, .. }
            | DecodeError::UnknownMessageType { line, .. }
            | DecodeError::InvalidMemo { line, .. } => *line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn input_error_file_not_found_display() {
        let err = InputError::FileNotFound {
            path: PathBuf::from("/tmp/missing.log"),
        };
        let msg = err.to_string();
        assert!(msg.contains("File not found"));
        assert!(msg.contains("/tmp/missing.log"));
    }

    #[test]
    fn input_error_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let input_err: InputError = io_err.into();
        let msg = input_err.to_string();
        assert!(msg.contains("IO error"));
        assert!(msg.contains("access denied"));
    }

    #[test]
    fn decode_error_unknown_type_display() {
        let err = DecodeError::UnknownMessageType {
            line: 12,
            message_type: "ZZ".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'ZZ'"));
        assert!(msg.contains("line 12"));
        assert_eq!(err.line(), 12);
    }

    #[test]
    fn app_error_from_decode_error() {
        let err: AppError = DecodeError::InvalidMemo {
            line: 1,
            reason: "missing ':'".to_string(),
        }
        .into();
        let msg = err.to_string();
        assert!(msg.contains("Failed to decode log line"));
        assert!(msg.contains("missing ':'"));
    }

    #[test]
    fn app_error_nested_io_through_input_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let input_err: InputError = io_err.into();
        let app_err: AppError = input_err.into();
        let msg = app_err.to_string();
        assert!(msg.contains("Failed to read input"));
        assert!(msg.contains("IO error"));
    }

    #[test]
    fn app_error_from_io_error_is_output() {
        let app_err: AppError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe broken").into();
        assert!(app_err.to_string().contains("Output error"));
    }
}
