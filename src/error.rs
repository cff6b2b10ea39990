//! Error types for Astrogation.
//!
//! This module provides a unified error handling approach using `thiserror`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Astrogation operations.
pub type Result<T> = std::result::Result<T, AstrogationError>;

/// Errors that can occur in Astrogation.
#[derive(Debug, Error)]
pub enum AstrogationError {
    /// Failed to open a file.
    #[error("Failed to open file: {path}")]
    FileOpen {
        /// Path that could not be opened.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// A settings or catalog file could not be parsed or written as JSON.
    #[error("Malformed {what}: {source}")]
    Json {
        /// What was being read or written.
        what: &'static str,
        /// Underlying serde failure.
        #[source]
        source: serde_json::Error,
    },

    /// The settings store refused a read or write.
    #[error("Settings unavailable: {0}")]
    Settings(String),

    /// Failed to access clipboard.
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal error.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl AstrogationError {
    /// Create a FileOpen error.
    pub fn file_open(path: PathBuf, source: std::io::Error) -> Self {
        Self::FileOpen { path, source }
    }

    /// Create a Json error.
    pub fn json(what: &'static str, source: serde_json::Error) -> Self {
        Self::Json { what, source }
    }

    /// Create a Settings error.
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings(message.into())
    }
}
