//! Voice classification
//!
//! Per-clip classification behind the `VoiceClassifier` seam, the guard that
//! turns short or failing clips into `unknown` votes, and the plurality vote
//! that settles one label per speaker.

pub mod classifier;
pub mod error;
pub mod pitch;
pub mod vote;

pub use classifier::{classify_guarded, VoiceClassifier};
pub use error::ClassificationFailure;
pub use pitch::{PitchClassifier, PitchConfig};
pub use vote::{label_clips, VoteTally};

// Re-export types from parley-core
pub use parley_core::{AudioClip, VoiceLabel};
