//! Speech-to-text collaborator seam
//!
//! Defines the transcriber interface consumed by the session analyzer and
//! the cleanup applied to raw model output.

pub mod error;
pub mod provider;

pub use error::AsrError;
pub use provider::{clean_segments, clean_transcript_text, JsonTranscriber, Transcriber};

// Re-export types from parley-core
pub use parley_core::TranscriptSegment;
