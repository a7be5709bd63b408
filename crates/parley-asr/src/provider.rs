//! Transcriber trait and file-backed implementation

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use parley_core::TranscriptSegment;
use regex::Regex;
use tracing::{debug, info};

use crate::error::AsrError;

/// Speech-to-text model
pub trait Transcriber: Send + Sync {
    /// Return time-stamped utterances in transcript order
    fn transcribe(&self, audio_path: &Path) -> anyhow::Result<Vec<TranscriptSegment>>;
}

/// Transcriber replaying precomputed segments from a JSON file.
///
/// The file holds an array of `{"start", "end", "text"}` objects.
pub struct JsonTranscriber {
    segments_path: PathBuf,
}

impl JsonTranscriber {
    pub fn new(segments_path: impl Into<PathBuf>) -> Self {
        Self {
            segments_path: segments_path.into(),
        }
    }

    /// Read, parse and clean the segments file
    pub fn load(&self) -> Result<Vec<TranscriptSegment>, AsrError> {
        if !self.segments_path.exists() {
            return Err(AsrError::FileNotFound(
                self.segments_path.display().to_string(),
            ));
        }

        let content = std::fs::read_to_string(&self.segments_path)?;
        let segments: Vec<TranscriptSegment> = serde_json::from_str(&content)?;
        Ok(clean_segments(segments))
    }
}

impl Transcriber for JsonTranscriber {
    fn transcribe(&self, audio_path: &Path) -> anyhow::Result<Vec<TranscriptSegment>> {
        debug!(
            "Replaying transcript for {} from {}",
            audio_path.display(),
            self.segments_path.display()
        );
        let segments = self.load()?;
        info!("Transcription loaded: {} segments", segments.len());
        Ok(segments)
    }
}

/// Clean every segment's text and drop segments left empty
pub fn clean_segments(segments: Vec<TranscriptSegment>) -> Vec<TranscriptSegment> {
    segments
        .into_iter()
        .filter_map(|mut segment| {
            segment.text = clean_transcript_text(&segment.text);
            if segment.text.is_empty() {
                None
            } else {
                Some(segment)
            }
        })
        .collect()
}

/// Strip `<|...|>` control tokens and collapse whitespace
pub fn clean_transcript_text(text: &str) -> String {
    static TOKENS: OnceLock<Regex> = OnceLock::new();
    let re = TOKENS.get_or_init(|| Regex::new(r"<\|[^|]+\|>").expect("valid token pattern"));
    re.replace_all(text, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_transcript_text() {
        assert_eq!(clean_transcript_text("<|startoftranscript|>Hello"), "Hello");
        assert_eq!(clean_transcript_text("Hello<|endoftext|>"), "Hello");
        assert_eq!(clean_transcript_text("  two   words \n"), "two words");
        assert_eq!(clean_transcript_text("<|tr|>Merhaba<|endoftext|>"), "Merhaba");
    }

    #[test]
    fn test_clean_segments_drops_empty() {
        let segments = vec![
            TranscriptSegment::new(0.0, 1.0, " hi "),
            TranscriptSegment::new(1.0, 2.0, "<|nospeech|>"),
        ];
        let cleaned = clean_segments(segments);
        assert_eq!(cleaned, vec![TranscriptSegment::new(0.0, 1.0, "hi")]);
    }

    #[test]
    fn test_json_transcriber() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("segments.json");
        std::fs::write(
            &path,
            r#"[{"start":0.0,"end":1.5,"text":" Hello there"},
                {"start":2.0,"end":3.0,"text":"  "}]"#,
        )
        .unwrap();

        let segments = JsonTranscriber::new(&path)
            .transcribe(Path::new("session.wav"))
            .unwrap();
        assert_eq!(segments, vec![TranscriptSegment::new(0.0, 1.5, "Hello there")]);
    }

    #[test]
    fn test_json_transcriber_missing_file() {
        assert!(matches!(
            JsonTranscriber::new("/nonexistent/segments.json").load(),
            Err(AsrError::FileNotFound(_))
        ));
    }
}
