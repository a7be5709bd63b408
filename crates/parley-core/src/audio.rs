//! Audio decoding and clip extraction

use std::fs::File;
use std::path::Path;

use hound::WavReader;
use serde::{Deserialize, Serialize};
use symphonia::core::audio::{AudioBufferRef, SampleBuffer};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;
use tracing::{debug, warn};

/// Headroom left by peak normalization, in dB
const NORMALIZE_HEADROOM_DB: f32 = 0.1;

/// Audio processing errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Audio file not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Hound(#[from] hound::Error),

    #[error("Resample error: {0}")]
    Resample(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

/// Decoded mono audio
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Mono f32 samples
    pub samples: Vec<f32>,
    /// Sample rate
    pub sample_rate: u32,
}

/// Clip preprocessing options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipOptions {
    /// Clips shorter than this are never classified
    pub min_clip_secs: f64,
    /// Clips are truncated to this length
    pub max_clip_secs: f64,
    /// Sample rate expected by the classifier
    pub sample_rate: u32,
}

impl Default for ClipOptions {
    fn default() -> Self {
        Self {
            min_clip_secs: 0.5,
            max_clip_secs: 3.0,
            sample_rate: 16000,
        }
    }
}

/// Mono, resampled, peak-normalized excerpt ready for classification
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    /// Source start time in seconds
    pub start: f64,
}

impl AudioClip {
    /// Length in seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

impl AudioData {
    /// Length in seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Sample index for a time, clamped to the buffer
    pub fn time_to_sample(&self, time_sec: f64) -> usize {
        let idx = (time_sec.max(0.0) * self.sample_rate as f64) as usize;
        idx.min(self.samples.len())
    }

    /// Cut `[start, end)` into a classifier-ready clip.
    ///
    /// The excerpt is truncated to `max_clip_secs`, resampled to the
    /// classifier rate and peak-normalized. A span past the end of the
    /// buffer yields a shorter (possibly empty) clip.
    pub fn extract_clip(
        &self,
        start: f64,
        end: f64,
        options: &ClipOptions,
    ) -> Result<AudioClip, AudioError> {
        let end = end.min(start + options.max_clip_secs);
        let first = self.time_to_sample(start);
        let last = self.time_to_sample(end).max(first);
        let excerpt = &self.samples[first..last];

        let samples = if self.sample_rate != options.sample_rate && !excerpt.is_empty() {
            resample(excerpt, self.sample_rate, options.sample_rate)?
        } else {
            excerpt.to_vec()
        };

        Ok(AudioClip {
            samples: normalize_peak(&samples),
            sample_rate: options.sample_rate,
            start,
        })
    }
}

/// Scale so the absolute peak sits just under full scale
pub fn normalize_peak(samples: &[f32]) -> Vec<f32> {
    let peak = samples.iter().fold(0.0f32, |max, &s| max.max(s.abs()));
    if peak == 0.0 {
        return samples.to_vec();
    }

    let target = 10f32.powf(-NORMALIZE_HEADROOM_DB / 20.0);
    let gain = target / peak;
    samples.iter().map(|&s| s * gain).collect()
}

/// Source of the full-session audio: total length and decoded buffer
pub trait AudioSource: Send + Sync {
    /// Total recording length in seconds
    fn duration(&self, path: &Path) -> anyhow::Result<f64>;

    /// Decode the whole recording to mono samples
    fn decode(&self, path: &Path) -> anyhow::Result<AudioData>;
}

/// File-backed audio decoder
pub struct AudioProcessor {
    /// Target sample rate for decoded audio
    target_sample_rate: u32,
}

impl AudioProcessor {
    pub fn new(target_sample_rate: u32) -> Self {
        Self { target_sample_rate }
    }

    /// Read the recording length without decoding samples
    pub fn probe_duration<P: AsRef<Path>>(&self, path: P) -> Result<f64, AudioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AudioError::FileNotFound(path.display().to_string()));
        }

        if backend_for(path)? == Backend::Wav {
            let reader = WavReader::open(path)?;
            let spec = reader.spec();
            return Ok(reader.duration() as f64 / spec.sample_rate as f64);
        }

        let format = probe(path)?;
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
            .ok_or_else(|| AudioError::Decode("No audio track found".to_string()))?;

        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| AudioError::Decode("Missing sample rate".to_string()))?;

        match track.codec_params.n_frames {
            Some(n_frames) => Ok(n_frames as f64 / sample_rate as f64),
            None => {
                // Frame count unknown in the container, fall back to a full decode
                debug!("No frame count in container, decoding to measure length");
                Ok(self.load(path)?.duration())
            }
        }
    }

    /// Decode an audio file to mono at the target sample rate
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<AudioData, AudioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AudioError::FileNotFound(path.display().to_string()));
        }

        match backend_for(path)? {
            Backend::Wav => self.load_wav(path),
            Backend::Symphonia => self.load_symphonia(path),
        }
    }

    fn load_wav(&self, path: &Path) -> Result<AudioData, AudioError> {
        let mut reader = WavReader::open(path)?;
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => {
                let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max_val))
                    .collect::<Result<Vec<_>, _>>()?
            }
            hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        };

        let mono = downmix(&samples, spec.channels as usize);
        self.finish(mono, spec.sample_rate)
    }

    fn load_symphonia(&self, path: &Path) -> Result<AudioData, AudioError> {
        let mut format = probe(path)?;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
            .ok_or_else(|| AudioError::Decode("No audio track found".to_string()))?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| AudioError::Decode("Missing sample rate".to_string()))?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::Decode(format!("Cannot create decoder: {}", e)))?;

        let mut all_samples: Vec<f32> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                Err(e) => {
                    end_of_stream(e)?;
                    break;
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => all_samples.extend(packet_to_mono(decoded)),
                // Corrupt packet, the stream itself is still readable
                Err(SymphoniaError::DecodeError(e)) => warn!("Packet decode error: {}", e),
                Err(e) => return Err(AudioError::Decode(format!("Decoder failed: {}", e))),
            }
        }

        self.finish(all_samples, sample_rate)
    }

    fn finish(&self, mono: Vec<f32>, sample_rate: u32) -> Result<AudioData, AudioError> {
        let samples = if sample_rate != self.target_sample_rate && !mono.is_empty() {
            resample(&mono, sample_rate, self.target_sample_rate)?
        } else {
            mono
        };

        Ok(AudioData {
            samples,
            sample_rate: self.target_sample_rate,
        })
    }
}

impl Default for AudioProcessor {
    fn default() -> Self {
        Self::new(16000)
    }
}

impl AudioSource for AudioProcessor {
    fn duration(&self, path: &Path) -> anyhow::Result<f64> {
        Ok(self.probe_duration(path)?)
    }

    fn decode(&self, path: &Path) -> anyhow::Result<AudioData> {
        Ok(self.load(path)?)
    }
}

/// Decoder backend for a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Wav,
    Symphonia,
}

/// Pick the backend from the file extension, shared by probing and loading
fn backend_for(path: &Path) -> Result<Backend, AudioError> {
    match extension_of(path).as_deref() {
        Some("wav") => Ok(Backend::Wav),
        Some("mp3") | Some("m4a") | Some("aac") | Some("flac") | Some("ogg") => {
            Ok(Backend::Symphonia)
        }
        Some(ext) => Err(AudioError::UnsupportedFormat(ext.to_string())),
        None => Err(AudioError::UnsupportedFormat("unknown".to_string())),
    }
}

/// `Ok` if a packet read error marks the end of the stream, otherwise the
/// read failure itself
fn end_of_stream(err: SymphoniaError) -> Result<(), AudioError> {
    match err {
        SymphoniaError::IoError(ref e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(()),
        e => Err(AudioError::Decode(format!("Packet read failed: {}", e))),
    }
}

/// Interleave and downmix one decoded packet.
///
/// The channel count comes from the packet itself; containers such as MP4
/// do not always declare it in the track parameters.
fn packet_to_mono(decoded: AudioBufferRef<'_>) -> Vec<f32> {
    let spec = *decoded.spec();
    let mut sample_buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
    sample_buf.copy_interleaved_ref(decoded);
    downmix(sample_buf.samples(), spec.channels.count())
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

fn probe(path: &Path) -> Result<Box<dyn symphonia::core::formats::FormatReader>, AudioError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| AudioError::Decode(format!("Cannot probe format: {}", e)))?;

    Ok(probed.format)
}

/// Average interleaved channels into mono
fn downmix(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks(channels)
        .map(|chunk| chunk.iter().sum::<f32>() / chunk.len() as f32)
        .collect()
}

/// Resample mono audio between rates
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, AudioError> {
    use rubato::{FftFixedInOut, Resampler};

    if from_rate == 0 || to_rate == 0 {
        return Err(AudioError::Resample(format!(
            "Invalid rates {} -> {}",
            from_rate, to_rate
        )));
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let chunk_size = 1024;

    let mut resampler =
        FftFixedInOut::<f32>::new(from_rate as usize, to_rate as usize, chunk_size, 1)
            .map_err(|e| AudioError::Resample(e.to_string()))?;
    let input_frames = resampler.input_frames_next();

    let mut output = Vec::with_capacity((samples.len() as f64 * ratio) as usize);

    for chunk in samples.chunks(input_frames) {
        let produced = (chunk.len() as f64 * ratio).round() as usize;
        let mut padded = chunk.to_vec();
        padded.resize(input_frames, 0.0);

        let input = vec![padded];
        let result = resampler
            .process(&input, None)
            .map_err(|e| AudioError::Resample(e.to_string()))?;
        output.extend_from_slice(&result[0][..produced.min(result[0].len())]);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(seconds: f64, sample_rate: u32, amplitude: f32) -> AudioData {
        let n = (seconds * sample_rate as f64) as usize;
        let samples = (0..n)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                amplitude * (2.0 * std::f32::consts::PI * 200.0 * t).sin()
            })
            .collect();
        AudioData {
            samples,
            sample_rate,
        }
    }

    #[test]
    fn test_extract_clip_truncates_to_max() {
        let audio = tone(10.0, 16000, 0.2);
        let clip = audio.extract_clip(1.0, 8.0, &ClipOptions::default()).unwrap();
        assert!((clip.duration() - 3.0).abs() < 1e-3);
        assert_eq!(clip.sample_rate, 16000);
    }

    #[test]
    fn test_extract_clip_normalizes_peak() {
        let audio = tone(2.0, 16000, 0.1);
        let clip = audio.extract_clip(0.0, 1.0, &ClipOptions::default()).unwrap();
        let peak = clip.samples.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
        assert!(peak > 0.98 && peak <= 1.0);
    }

    #[test]
    fn test_extract_clip_past_end_is_short() {
        let audio = tone(1.0, 16000, 0.5);
        let clip = audio.extract_clip(0.8, 2.0, &ClipOptions::default()).unwrap();
        assert!((clip.duration() - 0.2).abs() < 1e-3);

        let empty = audio.extract_clip(5.0, 6.0, &ClipOptions::default()).unwrap();
        assert!(empty.samples.is_empty());
    }

    #[test]
    fn test_extract_clip_resamples() {
        let audio = tone(2.0, 48000, 0.5);
        let clip = audio.extract_clip(0.0, 1.0, &ClipOptions::default()).unwrap();
        assert_eq!(clip.sample_rate, 16000);
        assert!((clip.samples.len() as i64 - 16000).abs() < 64);
    }

    #[test]
    fn test_normalize_silence_untouched() {
        assert_eq!(normalize_peak(&[0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_downmix_stereo() {
        assert_eq!(downmix(&[1.0, 0.0, 0.5, 0.5], 2), vec![0.5, 0.5]);
    }

    #[test]
    fn test_wav_round_trip_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..(16000 * 2) {
            writer.write_sample(1000i16).unwrap();
            writer.write_sample(1000i16).unwrap();
        }
        writer.finalize().unwrap();

        let processor = AudioProcessor::new(16000);
        assert!((processor.probe_duration(&path).unwrap() - 2.0).abs() < 1e-9);

        let audio = processor.load(&path).unwrap();
        assert_eq!(audio.samples.len(), 32000);
        assert!((audio.duration() - 2.0).abs() < 1e-9);
    }

    fn planar_packet(channels: &[Vec<f32>]) -> symphonia::core::audio::AudioBuffer<f32> {
        use symphonia::core::audio::{AudioBuffer, Channels, Signal, SignalSpec};

        let layout = if channels.len() == 1 {
            Channels::FRONT_LEFT
        } else {
            Channels::FRONT_LEFT | Channels::FRONT_RIGHT
        };
        let frames = channels[0].len();
        let mut buf = AudioBuffer::<f32>::new(frames as u64, SignalSpec::new(16000, layout));
        buf.render_reserved(Some(frames));
        for (ch, data) in channels.iter().enumerate() {
            buf.chan_mut(ch).copy_from_slice(data);
        }
        buf
    }

    #[test]
    fn test_mono_packet_keeps_every_frame() {
        let buf = planar_packet(&[vec![0.1, 0.2, 0.3, 0.4]]);
        let mono = packet_to_mono(AudioBufferRef::F32(std::borrow::Cow::Borrowed(&buf)));
        assert_eq!(mono, vec![0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_stereo_packet_is_averaged() {
        let buf = planar_packet(&[vec![1.0, 0.0], vec![0.0, 0.5]]);
        let mono = packet_to_mono(AudioBufferRef::F32(std::borrow::Cow::Borrowed(&buf)));
        assert_eq!(mono, vec![0.5, 0.25]);
    }

    #[test]
    fn test_symphonia_mono_length_matches_probe() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..16000 {
            writer.write_sample(((i % 100) as i16 - 50) * 100).unwrap();
        }
        writer.finalize().unwrap();

        let audio = AudioProcessor::new(16000).load_symphonia(&path).unwrap();
        assert_eq!(audio.samples.len(), 16000);
        assert!((audio.duration() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unsupported_extension_rejected_by_probe_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.opus");
        std::fs::write(&path, b"not audio").unwrap();

        let processor = AudioProcessor::default();
        assert!(matches!(
            processor.probe_duration(&path),
            Err(AudioError::UnsupportedFormat(ext)) if ext == "opus"
        ));
        assert!(matches!(
            processor.load(&path),
            Err(AudioError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_only_eof_ends_packet_reading() {
        let eof = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "end of stream");
        assert!(end_of_stream(SymphoniaError::IoError(eof)).is_ok());

        let fault = std::io::Error::new(std::io::ErrorKind::Other, "read fault");
        assert!(matches!(
            end_of_stream(SymphoniaError::IoError(fault)),
            Err(AudioError::Decode(_))
        ));
        assert!(matches!(
            end_of_stream(SymphoniaError::DecodeError("bad header")),
            Err(AudioError::Decode(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let processor = AudioProcessor::default();
        assert!(matches!(
            processor.load("/nonexistent/file.wav"),
            Err(AudioError::FileNotFound(_))
        ));
    }
}
