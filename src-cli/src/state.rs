//! Collaborator wiring

use std::sync::Arc;

use parley_asr::JsonTranscriber;
use parley_core::AudioProcessor;
use parley_diarization::JsonDiarizer;
use parley_session::{AnalysisConfig, SessionAnalyzer};
use parley_voice::PitchClassifier;

use crate::args::CliArgs;

/// Long-lived collaborators, built once per process
pub struct AppState {
    pub analyzer: SessionAnalyzer,
}

impl AppState {
    pub fn new(args: &CliArgs, config: AnalysisConfig) -> Self {
        // Decode straight to the classifier rate so clips need no resampling
        let processor = AudioProcessor::new(config.clip.sample_rate);

        Self {
            analyzer: SessionAnalyzer::new(
                Arc::new(processor),
                Arc::new(JsonDiarizer::new(args.diarization.clone())),
                Arc::new(JsonTranscriber::new(args.transcript.clone())),
                Arc::new(PitchClassifier::default()),
                config,
            ),
        }
    }
}
