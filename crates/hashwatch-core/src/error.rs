//! Unified error types for hashwatch

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for all hashwatch operations
#[derive(Error, Debug)]
pub enum HashwatchError {
    // Interaction errors
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Browser session error: {0}")]
    Session(String),

    // Extraction errors
    #[error("No network request matched the marker set ({0} entries scanned)")]
    NoMatchingRequest(usize),

    #[error("{0} candidate request(s) matched but none carried a sha256Hash field")]
    HashFieldMissing(usize),

    // Storage errors
    #[error("Stored hash I/O error at {}: {source}", path.display())]
    StorageIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

impl HashwatchError {
    /// True for the two failures that mean "the page loaded but no hash was found".
    ///
    /// These end the run normally without touching the stored hash.
    pub fn is_extraction_miss(&self) -> bool {
        matches!(self, Self::NoMatchingRequest(_) | Self::HashFieldMissing(_))
    }
}

/// Result type alias using HashwatchError
pub type Result<T> = std::result::Result<T, HashwatchError>;
