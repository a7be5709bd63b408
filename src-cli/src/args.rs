//! Command-line arguments

use std::path::PathBuf;

use anyhow::{bail, Context};

pub const USAGE: &str = "\
Usage: parley <audio> --diarization <turns.json> --transcript <segments.json> [options]

Options:
  -d, --diarization <path>  Speaker turns as JSON [{start, end, speaker_id}]
  -t, --transcript <path>   Transcript segments as JSON [{start, end, text}]
  -c, --config <path>       Analysis config (JSON)
  -o, --output <path>       Write the JSON report here
  -h, --help                Print this help";

#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub audio: PathBuf,
    pub diarization: PathBuf,
    pub transcript: PathBuf,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl CliArgs {
    /// Parse arguments (without the program name); `None` when help was requested
    pub fn parse<I>(args: I) -> anyhow::Result<Option<Self>>
    where
        I: IntoIterator<Item = String>,
    {
        let mut audio = None;
        let mut diarization = None;
        let mut transcript = None;
        let mut config = None;
        let mut output = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let slot = match arg.as_str() {
                "-h" | "--help" => return Ok(None),
                "-d" | "--diarization" => &mut diarization,
                "-t" | "--transcript" => &mut transcript,
                "-c" | "--config" => &mut config,
                "-o" | "--output" => &mut output,
                flag if flag.starts_with('-') => bail!("Unknown option: {}", flag),
                _ => {
                    if audio.is_some() {
                        bail!("Unexpected argument: {}", arg);
                    }
                    audio = Some(PathBuf::from(&arg));
                    continue;
                }
            };

            let value = args
                .next()
                .with_context(|| format!("Missing value for {}", arg))?;
            *slot = Some(PathBuf::from(value));
        }

        Ok(Some(Self {
            audio: audio.context("Missing audio path")?,
            diarization: diarization.context("Missing --diarization")?,
            transcript: transcript.context("Missing --transcript")?,
            config,
            output,
        }))
    }
}
