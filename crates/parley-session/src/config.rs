//! Analysis configuration

use std::path::Path;

use parley_core::ClipOptions;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for one session analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Longest turns classified per speaker
    pub clips_per_speaker: usize,
    /// Overlap a speaker must strictly exceed to own a transcript segment (seconds)
    pub min_overlap_secs: f64,
    /// Clip extraction and minimum classifiable length
    pub clip: ClipOptions,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            clips_per_speaker: 3,
            min_overlap_secs: 0.1,
            clip: ClipOptions::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load from a JSON file; missing fields keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"clips_per_speaker": 5, "clip": {"min_clip_secs": 1.0}}"#).unwrap();

        let config = AnalysisConfig::from_file(&path).unwrap();
        assert_eq!(config.clips_per_speaker, 5);
        assert_eq!(config.min_overlap_secs, 0.1);
        assert_eq!(config.clip.min_clip_secs, 1.0);
        assert_eq!(config.clip.max_clip_secs, 3.0);
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{").unwrap();
        assert!(matches!(AnalysisConfig::from_file(&path), Err(ConfigError::Json(_))));
    }
}
