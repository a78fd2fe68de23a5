//! Error types for rendergap operations.
//!
//! The comparison engine itself is total: tokenizing, diffing and scoring
//! never fail on text input. [`RendergapError`] covers the few places that
//! can: parsing a tokenization mode from a string, filtering HTML, fetching
//! raw markup and writing reports.
//!
//! # Example
//!
//! ```rust
//! use rendergap_core::{RendergapError, TokenMode};
//!
//! match "sentence".parse::<TokenMode>() {
//!     Ok(mode) => println!("mode: {mode}"),
//!     Err(RendergapError::InvalidMode(mode)) => println!("unsupported mode: {mode}"),
//!     Err(e) => println!("Error: {e}"),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for rendergap operations.
#[derive(Error, Debug)]
pub enum RendergapError {
    /// Unsupported tokenization mode.
    ///
    /// Only `word` and `line` are accepted. An unknown mode is a programmer
    /// error and is never silently replaced by a default.
    #[error("Invalid tokenization mode: {0:?} (expected \"word\" or \"line\")")]
    InvalidMode(String),

    /// HTML filtering errors.
    ///
    /// Returned when the markup rewriter rejects the document.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// HTTP request errors from reqwest.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[cfg(feature = "fetch")]
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read/write errors.
    #[error("I/O error: {0}")]
    WriteError(#[from] std::io::Error),

    /// Report serialization errors.
    #[error("Failed to serialize report: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RendergapError {
    fn from(err: serde_json::Error) -> Self {
        RendergapError::SerializationError(err.to_string())
    }
}

/// Result type alias for RendergapError.
pub type Result<T> = std::result::Result<T, RendergapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RendergapError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_invalid_mode_error() {
        let err = RendergapError::InvalidMode("char".to_string());
        let message = err.to_string();
        assert!(message.contains("\"char\""));
        assert!(message.contains("word"));
        assert!(message.contains("line"));
    }

    #[cfg(feature = "fetch")]
    #[test]
    fn test_timeout_error() {
        let err = RendergapError::Timeout { timeout: 30 };
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn test_serialization_error_from_serde() {
        let err: RendergapError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, RendergapError::SerializationError(_)));
    }
}
