//! parley-core - shared building blocks for session fusion
//!
//! Time intervals and their merging, the data model exchanged between the
//! diarization, transcription and voice crates, and access to the decoded
//! session audio.

pub mod audio;
pub mod interval;
pub mod types;

pub use audio::{AudioClip, AudioData, AudioError, AudioProcessor, AudioSource, ClipOptions};
pub use interval::{merge, total_length, Interval, InvalidIntervalError};
pub use types::*;
