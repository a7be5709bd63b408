//! Diarization error types

use parley_core::InvalidIntervalError;
use thiserror::Error;

/// Diarization-related errors
#[derive(Error, Debug)]
pub enum DiarizationError {
    /// A diarization row has malformed bounds
    #[error("Invalid speaker turn at row {index}: {source}")]
    InvalidTurn {
        index: usize,
        #[source]
        source: InvalidIntervalError,
    },

    /// A speaker's voice label was already finalized
    #[error("Voice label already assigned for speaker {0}")]
    LabelAlreadyAssigned(String),

    /// Diarization output file not found
    #[error("Diarization file not found: {0}")]
    FileNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Diarization output could not be parsed
    #[error("Invalid diarization output: {0}")]
    Parse(#[from] serde_json::Error),
}
