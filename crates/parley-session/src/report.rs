//! Session report and its numeric summaries

use parley_core::{percent_of, round2, VoiceLabel};
use parley_diarization::{AlignedSegment, SpeakerTimeline};
use serde::{Deserialize, Serialize};

/// Male/female split in percent
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub male: f64,
    pub female: f64,
}

impl Distribution {
    /// Percent split of two weights; `0/0` when both are zero
    pub fn from_weights(male: f64, female: f64) -> Self {
        let total = male + female;
        Self {
            male: round2(percent_of(male, total)),
            female: round2(percent_of(female, total)),
        }
    }
}

/// Data-quality conditions that do not fail the analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportWarning {
    /// Diarized speech is longer than the supplied recording length
    DurationInconsistency {
        speech_seconds: f64,
        duration_seconds: f64,
    },
}

impl std::fmt::Display for ReportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportWarning::DurationInconsistency {
                speech_seconds,
                duration_seconds,
            } => write!(
                f,
                "speech time {:.2}s exceeds recording duration {:.2}s",
                speech_seconds, duration_seconds
            ),
        }
    }
}

/// Per-speaker section of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerSummary {
    pub id: String,
    /// Total speaking time in seconds
    pub duration: f64,
    pub gender: VoiceLabel,
    /// Turns as `"start-end"`
    pub segments: Vec<String>,
    /// Attributed transcript as `"start-end: text"`
    pub transcripts: Vec<String>,
}

/// Fused result of one session analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub audio_path: String,
    pub duration_seconds: f64,
    pub speech_seconds: f64,
    /// May be negative, see `warnings`
    pub silence_seconds: f64,
    pub speech_ratio_percent: f64,
    pub silence_ratio_percent: f64,
    pub num_speakers: usize,
    pub speakers: Vec<SpeakerSummary>,
    /// Share of labeled speaking time
    pub gender_distribution: Distribution,
    /// Share of labeled speakers (headcount)
    pub participant_distribution: Distribution,
    /// `"<speaker>: <text>"` lines in transcript order
    pub transcript: Vec<String>,
    /// `transcript` joined with single spaces
    pub full_transcript: String,
    pub warnings: Vec<ReportWarning>,
}

/// Build the report from a labeled, transcript-aligned timeline.
///
/// Speakers without a finalized label count as `unknown`. Values are kept
/// unrounded until they are written into the report.
pub fn build_report(
    audio_path: &str,
    duration: f64,
    timeline: &SpeakerTimeline,
    aligned: &[AlignedSegment],
) -> SessionReport {
    let speech_seconds = timeline.speech_seconds();
    let silence_seconds = duration - speech_seconds;

    let mut warnings = Vec::new();
    if speech_seconds > duration {
        warnings.push(ReportWarning::DurationInconsistency {
            speech_seconds: round2(speech_seconds),
            duration_seconds: round2(duration),
        });
    }

    let mut male_time = 0.0;
    let mut female_time = 0.0;
    let mut male_count = 0usize;
    let mut female_count = 0usize;

    let speakers: Vec<SpeakerSummary> = timeline
        .speakers()
        .iter()
        .map(|record| {
            let gender = record.label().unwrap_or(VoiceLabel::Unknown);
            match gender {
                VoiceLabel::Male => {
                    male_time += record.duration;
                    male_count += 1;
                }
                VoiceLabel::Female => {
                    female_time += record.duration;
                    female_count += 1;
                }
                VoiceLabel::Unknown => {}
            }

            SpeakerSummary {
                id: record.speaker_id.clone(),
                duration: round2(record.duration),
                gender,
                segments: record.turns.iter().map(ToString::to_string).collect(),
                transcripts: record.transcripts.iter().map(ToString::to_string).collect(),
            }
        })
        .collect();

    let transcript: Vec<String> = aligned.iter().map(AlignedSegment::line).collect();
    let full_transcript = transcript.join(" ");

    SessionReport {
        audio_path: audio_path.to_string(),
        duration_seconds: round2(duration),
        speech_seconds: round2(speech_seconds),
        silence_seconds: round2(silence_seconds),
        speech_ratio_percent: round2(percent_of(speech_seconds, duration)),
        silence_ratio_percent: round2(percent_of(silence_seconds, duration)),
        num_speakers: speakers.len(),
        speakers,
        gender_distribution: Distribution::from_weights(male_time, female_time),
        participant_distribution: Distribution::from_weights(male_count as f64, female_count as f64),
        transcript,
        full_transcript,
        warnings,
    }
}
