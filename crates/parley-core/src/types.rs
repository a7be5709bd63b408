//! Shared type definitions

use serde::{Deserialize, Serialize};

use crate::interval::{Interval, InvalidIntervalError};

/// Raw diarization row as emitted by a diarization model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiarizedTurn {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Speaker label (e.g., "SPEAKER_00")
    pub speaker_id: String,
}

impl DiarizedTurn {
    pub fn new(start: f64, end: f64, speaker_id: impl Into<String>) -> Self {
        Self {
            start,
            end,
            speaker_id: speaker_id.into(),
        }
    }
}

/// Validated speaker turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerTurn {
    pub interval: Interval,
    pub speaker_id: String,
}

impl TryFrom<DiarizedTurn> for SpeakerTurn {
    type Error = InvalidIntervalError;

    fn try_from(turn: DiarizedTurn) -> Result<Self, Self::Error> {
        Ok(Self {
            interval: Interval::new(turn.start, turn.end)?,
            speaker_id: turn.speaker_id,
        })
    }
}

/// Transcribed utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Transcribed text
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// Voice label for a clip or a speaker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceLabel {
    Male,
    Female,
    Unknown,
}

impl VoiceLabel {
    /// Tie-break priority for plurality votes, highest first
    pub const PRIORITY: [VoiceLabel; 3] = [VoiceLabel::Male, VoiceLabel::Female, VoiceLabel::Unknown];

    pub fn is_known(&self) -> bool {
        !matches!(self, VoiceLabel::Unknown)
    }
}

impl std::fmt::Display for VoiceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoiceLabel::Male => write!(f, "male"),
            VoiceLabel::Female => write!(f, "female"),
            VoiceLabel::Unknown => write!(f, "unknown"),
        }
    }
}

/// Round to two decimals, half away from zero.
///
/// Every duration and percentage in a report goes through this.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole * 100`, or `0.0` when `whole` is not positive
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(58.333333), 58.33);
        assert_eq!(round2(2.0), 2.0);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(66.666666), 66.67);
    }

    #[test]
    fn test_percent_of_zero_guard() {
        assert_eq!(percent_of(3.0, 0.0), 0.0);
        assert_eq!(percent_of(3.0, -1.0), 0.0);
        assert_eq!(percent_of(1.0, 4.0), 25.0);
    }

    #[test]
    fn test_speaker_turn_from_row() {
        let ok = SpeakerTurn::try_from(DiarizedTurn::new(0.0, 1.5, "A")).unwrap();
        assert_eq!(ok.interval.duration(), 1.5);
        assert!(SpeakerTurn::try_from(DiarizedTurn::new(1.5, 1.5, "A")).is_err());
    }

    #[test]
    fn test_voice_label_serde() {
        assert_eq!(serde_json::to_string(&VoiceLabel::Female).unwrap(), "\"female\"");
        assert_eq!(VoiceLabel::Unknown.to_string(), "unknown");
    }
}
