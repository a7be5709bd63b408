//! Session analysis
//!
//! Runs diarization, transcription and voice classification for one
//! recording and fuses them into a `SessionReport`.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod exporter;
pub mod report;

pub use analyzer::SessionAnalyzer;
pub use config::AnalysisConfig;
pub use error::{AnalysisError, ConfigError, ExportError};
pub use exporter::Exporter;
pub use report::{build_report, Distribution, ReportWarning, SessionReport, SpeakerSummary};
