//! Voice classification error types

use thiserror::Error;

/// A single clip could not be classified.
///
/// Never fatal: the clip's vote degrades to `unknown`.
#[derive(Error, Debug)]
pub enum ClassificationFailure {
    /// Clip has no samples
    #[error("Clip is empty")]
    EmptyClip,

    /// No voiced pitch could be measured
    #[error("No voiced pitch found in clip")]
    Unvoiced,
}
