//! Diarization collaborator seam

use std::path::{Path, PathBuf};

use parley_core::DiarizedTurn;
use tracing::{debug, info};

use crate::error::DiarizationError;

/// Speaker diarization model: who spoke when
pub trait Diarizer: Send + Sync {
    /// Return speaker turns for the recording, in model emission order
    fn diarize(&self, audio_path: &Path) -> anyhow::Result<Vec<DiarizedTurn>>;
}

/// Diarizer replaying precomputed turns from a JSON file.
///
/// The file holds an array of `{"start", "end", "speaker_id"}` objects.
pub struct JsonDiarizer {
    turns_path: PathBuf,
}

impl JsonDiarizer {
    pub fn new(turns_path: impl Into<PathBuf>) -> Self {
        Self {
            turns_path: turns_path.into(),
        }
    }

    /// Read and parse the turns file
    pub fn load(&self) -> Result<Vec<DiarizedTurn>, DiarizationError> {
        if !self.turns_path.exists() {
            return Err(DiarizationError::FileNotFound(
                self.turns_path.display().to_string(),
            ));
        }

        let content = std::fs::read_to_string(&self.turns_path)?;
        let turns: Vec<DiarizedTurn> = serde_json::from_str(&content)?;
        Ok(turns)
    }
}

impl Diarizer for JsonDiarizer {
    fn diarize(&self, audio_path: &Path) -> anyhow::Result<Vec<DiarizedTurn>> {
        debug!(
            "Replaying diarization for {} from {}",
            audio_path.display(),
            self.turns_path.display()
        );
        let turns = self.load()?;
        info!("Diarization loaded: {} turns", turns.len());
        Ok(turns)
    }
}
