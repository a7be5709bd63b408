//! Assign transcript segments to diarized speakers

use parley_core::TranscriptSegment;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::timeline::{SpeakerRecord, SpeakerTimeline, TranscriptFragment};

/// Label used for segments no speaker overlaps enough
pub const UNATTRIBUTED: &str = "UNATTRIBUTED";

/// Who a transcript segment was given to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribution {
    Speaker(String),
    Unattributed,
}

impl std::fmt::Display for Attribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attribution::Speaker(id) => write!(f, "{}", id),
            Attribution::Unattributed => write!(f, "{}", UNATTRIBUTED),
        }
    }
}

/// A transcript segment with its attribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedSegment {
    pub attribution: Attribution,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl AlignedSegment {
    /// `"<speaker>: <text>"` line for the session transcript
    pub fn line(&self) -> String {
        format!("{}: {}", self.attribution, self.text)
    }
}

/// Maximum-overlap transcript aligner
#[derive(Debug, Clone)]
pub struct TranscriptAligner {
    /// A speaker must overlap a segment by strictly more than this
    min_overlap_secs: f64,
}

impl TranscriptAligner {
    pub fn new(min_overlap_secs: f64) -> Self {
        Self { min_overlap_secs }
    }

    /// Index of the speaker whose single best turn overlaps `segment` most.
    ///
    /// Speakers are scanned in timeline order and only a strictly larger
    /// overlap replaces the current best, so ties go to the speaker seen
    /// first in the diarization output.
    pub fn best_speaker(&self, segment: &TranscriptSegment, speakers: &[SpeakerRecord]) -> Option<usize> {
        let mut best: Option<usize> = None;
        let mut max_overlap = self.min_overlap_secs;

        for (idx, speaker) in speakers.iter().enumerate() {
            for turn in &speaker.turns {
                let overlap = turn.overlap_with(segment.start, segment.end);
                if overlap > max_overlap {
                    max_overlap = overlap;
                    best = Some(idx);
                }
            }
        }

        best
    }

    /// Attribute every segment, in transcript order.
    ///
    /// Attributed text is also appended to the winning speaker's record.
    pub fn assign(
        &self,
        segments: Vec<TranscriptSegment>,
        timeline: &mut SpeakerTimeline,
    ) -> Vec<AlignedSegment> {
        let mut aligned = Vec::with_capacity(segments.len());
        let mut unattributed = 0usize;

        for segment in segments {
            let text = segment.text.trim().to_string();
            let attribution = match self.best_speaker(&segment, timeline.speakers()) {
                Some(idx) => {
                    let record = &mut timeline.speakers_mut()[idx];
                    record.transcripts.push(TranscriptFragment {
                        start: segment.start,
                        end: segment.end,
                        text: text.clone(),
                    });
                    Attribution::Speaker(record.speaker_id.clone())
                }
                None => {
                    debug!(
                        "No speaker overlaps {:.2}-{:.2} by more than {}s",
                        segment.start, segment.end, self.min_overlap_secs
                    );
                    unattributed += 1;
                    Attribution::Unattributed
                }
            };

            aligned.push(AlignedSegment {
                attribution,
                start: segment.start,
                end: segment.end,
                text,
            });
        }

        info!(
            "Transcript aligned: {} segments, {} unattributed",
            aligned.len(),
            unattributed
        );
        aligned
    }
}

impl Default for TranscriptAligner {
    fn default() -> Self {
        Self::new(0.1)
    }
}
