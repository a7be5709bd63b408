//! Report export

use std::fs;
use std::path::Path;

use chrono::Local;
use serde::Serialize;

use crate::error::ExportError;
use crate::report::SessionReport;

const REPORT_VERSION: &str = "1.0";

/// Report exporter
pub struct Exporter;

impl Exporter {
    /// Write the report as JSON, creating parent directories as needed
    pub fn to_json<P: AsRef<Path>>(
        report: &SessionReport,
        output_path: P,
        pretty: bool,
    ) -> Result<(), ExportError> {
        let output_path = output_path.as_ref();

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = JsonReport {
            version: REPORT_VERSION,
            generated_at: Local::now().to_rfc3339(),
            report,
        };

        let json = if pretty {
            serde_json::to_string_pretty(&data)?
        } else {
            serde_json::to_string(&data)?
        };

        fs::write(output_path, json)?;
        Ok(())
    }

    /// Human-readable summary
    pub fn to_text(report: &SessionReport) -> String {
        let mut lines = vec![
            format!("Session: {}", report.audio_path),
            format!(
                "Duration: {:.2}s, speech {:.2}s ({:.2}%), silence {:.2}s ({:.2}%)",
                report.duration_seconds,
                report.speech_seconds,
                report.speech_ratio_percent,
                report.silence_seconds,
                report.silence_ratio_percent
            ),
            format!(
                "Speaking time: male {:.2}%, female {:.2}%",
                report.gender_distribution.male, report.gender_distribution.female
            ),
            format!(
                "Participants: male {:.2}%, female {:.2}%",
                report.participant_distribution.male, report.participant_distribution.female
            ),
            format!("Speakers: {}", report.num_speakers),
        ];

        for speaker in &report.speakers {
            lines.push(format!(
                "  {} [{}] {:.2}s in {} turns",
                speaker.id,
                speaker.gender,
                speaker.duration,
                speaker.segments.len()
            ));
        }

        if !report.transcript.is_empty() {
            lines.push(String::new());
            lines.push("Transcript:".to_string());
            lines.extend(report.transcript.iter().map(|line| format!("  {}", line)));
        }

        for warning in &report.warnings {
            lines.push(format!("Warning: {}", warning));
        }

        lines.join("\n")
    }
}

/// JSON envelope around the report
#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    generated_at: String,
    #[serde(flatten)]
    report: &'a SessionReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::build_report;
    use parley_core::{DiarizedTurn, VoiceLabel};
    use parley_diarization::SpeakerTimeline;

    fn sample_report() -> SessionReport {
        let mut tl = SpeakerTimeline::from_turns(vec![
            DiarizedTurn::new(0.0, 2.0, "A"),
            DiarizedTurn::new(2.5, 4.0, "B"),
        ])
        .unwrap();
        tl.get_mut("A").unwrap().set_label(VoiceLabel::Male).unwrap();
        build_report("session.wav", 6.0, &tl, &[])
    }

    #[test]
    fn test_json_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.json");

        Exporter::to_json(&sample_report(), &path, true).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["version"], "1.0");
        assert!(value["generated_at"].is_string());
        assert_eq!(value["audio_path"], "session.wav");
        assert_eq!(value["num_speakers"], 2);
        assert_eq!(value["speakers"][0]["gender"], "male");
        assert_eq!(value["speakers"][1]["gender"], "unknown");
    }

    #[test]
    fn test_text_summary() {
        let text = Exporter::to_text(&sample_report());
        assert!(text.contains("Session: session.wav"));
        assert!(text.contains("speech 3.50s"));
        assert!(text.contains("A [male] 2.00s in 1 turns"));
        assert!(!text.contains("Transcript:"));
    }
}
