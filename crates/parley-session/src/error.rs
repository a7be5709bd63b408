//! Session analysis error types

use parley_diarization::DiarizationError;
use thiserror::Error;

/// Terminal failures of a session analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Diarization or transcription model failed
    #[error("{stage} failed: {source}")]
    UpstreamModel {
        stage: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// Session audio could not be read
    #[error("Audio unavailable: {source}")]
    Audio {
        #[source]
        source: anyhow::Error,
    },

    /// Diarization output was malformed
    #[error(transparent)]
    Diarization(#[from] DiarizationError),

    /// A worker task panicked or was cancelled
    #[error("Worker task failed: {0}")]
    TaskJoin(String),
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Report export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
