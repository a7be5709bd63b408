//! ASR error types

use thiserror::Error;

/// ASR-related errors
#[derive(Error, Debug)]
pub enum AsrError {
    /// Transcript file not found
    #[error("Transcript file not found: {0}")]
    FileNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Transcript could not be parsed
    #[error("Invalid transcript: {0}")]
    Parse(#[from] serde_json::Error),
}
