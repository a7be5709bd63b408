//! Speaker diarization fusion
//!
//! Builds per-speaker timelines from diarization output, picks the turns
//! used for voice classification and attributes transcript segments to
//! speakers by temporal overlap.

pub mod error;
pub mod merger;
pub mod provider;
pub mod sampler;
pub mod timeline;

pub use error::DiarizationError;
pub use merger::{AlignedSegment, Attribution, TranscriptAligner, UNATTRIBUTED};
pub use provider::{Diarizer, JsonDiarizer};
pub use sampler::select_longest;
pub use timeline::{SpeakerRecord, SpeakerTimeline, TranscriptFragment};

// Re-export types from parley-core
pub use parley_core::{DiarizedTurn, Interval, TranscriptSegment};
