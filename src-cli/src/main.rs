//! Parley command-line host
//!
//! Wires file-backed diarization and transcription, the pitch classifier and
//! the audio decoder into a `SessionAnalyzer` and reports one recording.

mod args;
mod state;

use anyhow::Context;
use parley_session::{AnalysisConfig, Exporter};
use tracing::info;
use tracing_subscriber::EnvFilter;

use args::CliArgs;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match CliArgs::parse(std::env::args().skip(1))? {
        Some(args) => args,
        None => {
            println!("{}", args::USAGE);
            return Ok(());
        }
    };

    let config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    let state = AppState::new(&args, config);
    let report = state
        .analyzer
        .analyze(&args.audio)
        .await
        .with_context(|| format!("Analysis failed for {}", args.audio.display()))?;

    println!("{}", Exporter::to_text(&report));

    if let Some(output) = &args.output {
        Exporter::to_json(&report, output, true)?;
        info!("Report written to {}", output.display());
    }

    Ok(())
}
