//! Session analysis orchestrator

use std::path::Path;
use std::sync::Arc;

use futures::future::join_all;
use parley_asr::Transcriber;
use parley_core::{AudioData, AudioSource, Interval, VoiceLabel};
use parley_diarization::{select_longest, Diarizer, SpeakerTimeline, TranscriptAligner};
use parley_voice::{classify_guarded, VoiceClassifier, VoteTally};
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::report::{build_report, SessionReport};

/// Fuses diarization, transcription and voice classification for one recording.
///
/// Model collaborators are built once by the host and shared across
/// requests; the analyzer itself keeps no per-request state.
pub struct SessionAnalyzer {
    audio: Arc<dyn AudioSource>,
    diarizer: Arc<dyn Diarizer>,
    transcriber: Arc<dyn Transcriber>,
    classifier: Arc<dyn VoiceClassifier>,
    config: AnalysisConfig,
}

impl SessionAnalyzer {
    pub fn new(
        audio: Arc<dyn AudioSource>,
        diarizer: Arc<dyn Diarizer>,
        transcriber: Arc<dyn Transcriber>,
        classifier: Arc<dyn VoiceClassifier>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            audio,
            diarizer,
            transcriber,
            classifier,
            config,
        }
    }

    /// Analyze a recording, reading its duration from the audio source
    pub async fn analyze(&self, audio_path: &Path) -> Result<SessionReport, AnalysisError> {
        let audio = self.audio.clone();
        let path = audio_path.to_path_buf();
        let duration = run_blocking(move || audio.duration(&path))
            .await?
            .map_err(|source| AnalysisError::Audio { source })?;

        self.analyze_session(audio_path, duration).await
    }

    /// Analyze a recording of known total `duration` (seconds)
    pub async fn analyze_session(
        &self,
        audio_path: &Path,
        duration: f64,
    ) -> Result<SessionReport, AnalysisError> {
        info!("Starting session analysis: {}", audio_path.display());
        debug!("Config: {:?}", self.config);

        let path = audio_path.to_path_buf();

        let audio = self.audio.clone();
        let decode_path = path.clone();
        let diarizer = self.diarizer.clone();
        let diarize_path = path.clone();
        let transcriber = self.transcriber.clone();
        let transcribe_path = path.clone();

        let (decoded, turns, segments) = tokio::try_join!(
            async move {
                run_blocking(move || audio.decode(&decode_path))
                    .await?
                    .map_err(|source| AnalysisError::Audio { source })
            },
            async move {
                run_blocking(move || diarizer.diarize(&diarize_path))
                    .await?
                    .map_err(|source| AnalysisError::UpstreamModel {
                        stage: "diarization",
                        source,
                    })
            },
            async move {
                run_blocking(move || transcriber.transcribe(&transcribe_path))
                    .await?
                    .map_err(|source| AnalysisError::UpstreamModel {
                        stage: "transcription",
                        source,
                    })
            },
        )?;

        let mut timeline = SpeakerTimeline::from_turns(turns)?;
        if timeline.is_empty() {
            warn!("No speakers detected in {}", audio_path.display());
        }

        let aligned = TranscriptAligner::new(self.config.min_overlap_secs)
            .assign(segments, &mut timeline);

        let labels = self.label_speakers(&timeline, Arc::new(decoded)).await?;
        for (record, label) in timeline.speakers_mut().iter_mut().zip(labels) {
            record.set_label(label)?;
        }

        let report = build_report(&path.display().to_string(), duration, &timeline, &aligned);
        for warning in &report.warnings {
            warn!("Data quality: {}", warning);
        }

        info!(
            "Session analysis completed: {} speakers, {:.2}s speech of {:.2}s",
            report.num_speakers, report.speech_seconds, report.duration_seconds
        );
        Ok(report)
    }

    /// One label per speaker, in timeline order.
    ///
    /// Every sampled clip of every speaker is classified as its own blocking
    /// task against the shared decoded audio.
    async fn label_speakers(
        &self,
        timeline: &SpeakerTimeline,
        audio: Arc<AudioData>,
    ) -> Result<Vec<VoiceLabel>, AnalysisError> {
        let mut owners = Vec::new();
        let mut tasks = Vec::new();

        for (idx, record) in timeline.speakers().iter().enumerate() {
            let sampled = select_longest(&record.turns, self.config.clips_per_speaker);
            debug!(
                "Speaker {}: classifying {} of {} turns",
                record.speaker_id,
                sampled.len(),
                record.turns.len()
            );

            for turn in sampled {
                let audio = audio.clone();
                let classifier = self.classifier.clone();
                let options = self.config.clip.clone();
                owners.push(idx);
                tasks.push(tokio::task::spawn_blocking(move || {
                    classify_turn(&audio, turn, classifier.as_ref(), &options)
                }));
            }
        }

        let mut tallies = vec![VoteTally::new(); timeline.len()];
        for (idx, result) in owners.into_iter().zip(join_all(tasks).await) {
            let label = result.map_err(|e| AnalysisError::TaskJoin(e.to_string()))?;
            tallies[idx].record(label);
        }

        Ok(timeline
            .speakers()
            .iter()
            .zip(tallies)
            .map(|(record, tally)| {
                let label = tally.winner();
                debug!("Speaker {} labeled {} from {:?}", record.speaker_id, label, tally);
                label
            })
            .collect())
    }
}

/// Extract and classify one sampled turn; extraction failures vote unknown
fn classify_turn(
    audio: &AudioData,
    turn: Interval,
    classifier: &dyn VoiceClassifier,
    options: &parley_core::ClipOptions,
) -> VoiceLabel {
    match audio.extract_clip(turn.start(), turn.end(), options) {
        Ok(clip) => classify_guarded(classifier, &clip, options.min_clip_secs),
        Err(e) => {
            warn!("Clip extraction failed for {}: {}", turn, e);
            VoiceLabel::Unknown
        }
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, AnalysisError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AnalysisError::TaskJoin(e.to_string()))
}
