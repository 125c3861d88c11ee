//! Error types for the data-loader crate.
//!
//! Only whole-file problems surface here. Individual fields that fail to
//! parse (a runtime of `"n/a"`, a garbled release date) never produce an
//! error: they are read as absent and the affected signal simply stays quiet.

use thiserror::Error;

/// Errors that can occur while reading or writing record files
///
/// The `#[derive(Error)]` macro from thiserror implements `std::error::Error`
/// and `Display` from the `#[error(...)]` attributes.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading or writing a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A line is not a valid JSON object of the expected shape
    ///
    /// This variant stores context about where the error occurred
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A value could not be encoded as JSON
    #[error("Encode error: {0}")]
    EncodeError(#[from] serde_json::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
