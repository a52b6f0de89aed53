//! Keyscribe Error Definitions
//!
//! Defines error types used throughout the project.

use thiserror::Error;

/// Core engine error types
#[derive(Error, Debug)]
pub enum CoreError {
    // =========================================================================
    // Ingestion Errors
    // =========================================================================
    #[error("Unsupported transcript format: {0}")]
    UnsupportedFormat(String),

    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),

    #[error("Malformed content: {0}")]
    MalformedContent(String),

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Core engine result type
pub type CoreResult<T> = Result<T, CoreError>;
