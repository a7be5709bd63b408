//! Per-speaker accumulation of diarization turns

use std::collections::HashMap;

use parley_core::{merge, total_length, DiarizedTurn, Interval, SpeakerTurn, VoiceLabel};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DiarizationError;

/// Transcript text attributed to a speaker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptFragment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl std::fmt::Display for TranscriptFragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}-{:.2}: {}", self.start, self.end, self.text)
    }
}

/// Everything known about one speaker during a session
#[derive(Debug, Clone)]
pub struct SpeakerRecord {
    /// Speaker label from the diarizer
    pub speaker_id: String,
    /// Turns in emission order
    pub turns: Vec<Interval>,
    /// Sum of turn lengths, not de-duplicated
    pub duration: f64,
    /// Transcript fragments in transcript order
    pub transcripts: Vec<TranscriptFragment>,
    label: Option<VoiceLabel>,
}

impl SpeakerRecord {
    fn new(speaker_id: String) -> Self {
        Self {
            speaker_id,
            turns: Vec::new(),
            duration: 0.0,
            transcripts: Vec::new(),
            label: None,
        }
    }

    /// Finalized voice label, if assigned
    pub fn label(&self) -> Option<VoiceLabel> {
        self.label
    }

    /// Finalize the voice label. A label can only be set once.
    pub fn set_label(&mut self, label: VoiceLabel) -> Result<(), DiarizationError> {
        if self.label.is_some() {
            return Err(DiarizationError::LabelAlreadyAssigned(self.speaker_id.clone()));
        }
        self.label = Some(label);
        Ok(())
    }
}

/// Speaker records in first-seen order plus every turn interval
#[derive(Debug, Clone, Default)]
pub struct SpeakerTimeline {
    speakers: Vec<SpeakerRecord>,
    index: HashMap<String, usize>,
    all_turns: Vec<Interval>,
}

impl SpeakerTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest raw diarization rows in emission order
    pub fn from_turns<I>(rows: I) -> Result<Self, DiarizationError>
    where
        I: IntoIterator<Item = DiarizedTurn>,
    {
        let mut timeline = Self::new();
        for (index, row) in rows.into_iter().enumerate() {
            let turn = SpeakerTurn::try_from(row)
                .map_err(|source| DiarizationError::InvalidTurn { index, source })?;
            timeline.push(turn);
        }

        debug!(
            "Timeline built: {} speakers, {} turns",
            timeline.speakers.len(),
            timeline.all_turns.len()
        );
        Ok(timeline)
    }

    /// Append one validated turn
    pub fn push(&mut self, turn: SpeakerTurn) {
        let idx = match self.index.get(&turn.speaker_id) {
            Some(&idx) => idx,
            None => {
                let idx = self.speakers.len();
                self.index.insert(turn.speaker_id.clone(), idx);
                self.speakers.push(SpeakerRecord::new(turn.speaker_id));
                idx
            }
        };

        let record = &mut self.speakers[idx];
        record.duration += turn.interval.duration();
        record.turns.push(turn.interval);
        self.all_turns.push(turn.interval);
    }

    /// Speakers in first-seen order
    pub fn speakers(&self) -> &[SpeakerRecord] {
        &self.speakers
    }

    pub fn speakers_mut(&mut self) -> &mut [SpeakerRecord] {
        &mut self.speakers
    }

    pub fn get(&self, speaker_id: &str) -> Option<&SpeakerRecord> {
        self.index.get(speaker_id).map(|&idx| &self.speakers[idx])
    }

    pub fn get_mut(&mut self, speaker_id: &str) -> Option<&mut SpeakerRecord> {
        match self.index.get(speaker_id) {
            Some(&idx) => Some(&mut self.speakers[idx]),
            None => None,
        }
    }

    /// Every turn interval regardless of speaker
    pub fn all_turns(&self) -> &[Interval] {
        &self.all_turns
    }

    /// Union of all turns across speakers
    pub fn speech_mask(&self) -> Vec<Interval> {
        merge(&self.all_turns)
    }

    /// Length of the speech mask, overlapping speakers counted once
    pub fn speech_seconds(&self) -> f64 {
        total_length(&self.speech_mask())
    }

    pub fn len(&self) -> usize {
        self.speakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<DiarizedTurn> {
        vec![
            DiarizedTurn::new(0.0, 2.0, "A"),
            DiarizedTurn::new(2.5, 4.0, "B"),
            DiarizedTurn::new(5.0, 6.0, "A"),
        ]
    }

    #[test]
    fn test_first_seen_order_and_durations() {
        let timeline = SpeakerTimeline::from_turns(rows()).unwrap();
        let ids: Vec<_> = timeline.speakers().iter().map(|s| s.speaker_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);

        let a = timeline.get("A").unwrap();
        assert_eq!(a.turns.len(), 2);
        assert!((a.duration - 3.0).abs() < 1e-9);
        assert_eq!(a.turns[1].start(), 5.0);
        assert_eq!(timeline.all_turns().len(), 3);
    }

    #[test]
    fn test_speech_seconds_counts_overlap_once() {
        let timeline = SpeakerTimeline::from_turns(vec![
            DiarizedTurn::new(0.0, 3.0, "A"),
            DiarizedTurn::new(2.0, 4.0, "B"),
        ])
        .unwrap();
        assert!((timeline.speech_seconds() - 4.0).abs() < 1e-9);
        let summed: f64 = timeline.speakers().iter().map(|s| s.duration).sum();
        assert!((summed - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_row_reports_index() {
        let err = SpeakerTimeline::from_turns(vec![
            DiarizedTurn::new(0.0, 1.0, "A"),
            DiarizedTurn::new(3.0, 2.0, "B"),
        ])
        .unwrap_err();
        assert!(matches!(err, DiarizationError::InvalidTurn { index: 1, .. }));
    }

    #[test]
    fn test_label_set_once() {
        let mut timeline = SpeakerTimeline::from_turns(rows()).unwrap();
        let a = timeline.get_mut("A").unwrap();
        assert_eq!(a.label(), None);
        a.set_label(VoiceLabel::Male).unwrap();
        assert!(a.set_label(VoiceLabel::Female).is_err());
        assert_eq!(a.label(), Some(VoiceLabel::Male));
    }

    #[test]
    fn test_empty_timeline() {
        let timeline = SpeakerTimeline::from_turns(Vec::new()).unwrap();
        assert!(timeline.is_empty());
        assert_eq!(timeline.speech_seconds(), 0.0);
    }

    #[test]
    fn test_fragment_display() {
        let fragment = TranscriptFragment {
            start: 1.0,
            end: 2.456,
            text: "Hello".to_string(),
        };
        assert_eq!(fragment.to_string(), "1.00-2.46: Hello");
    }
}
