//! Reference classifier based on fundamental frequency

use parley_core::{AudioClip, VoiceLabel};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::VoiceClassifier;
use crate::error::ClassificationFailure;

const OCTAVE_TOLERANCE: f64 = 0.9;

/// Pitch classifier settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchConfig {
    /// Median F0 at or above this is labeled female (Hz)
    pub split_hz: f64,
    /// Lowest F0 searched (Hz)
    pub min_hz: f64,
    /// Highest F0 searched (Hz)
    pub max_hz: f64,
    /// Analysis frame length (ms)
    pub frame_ms: u32,
    /// Minimum normalized autocorrelation for a frame to count as voiced
    pub voicing_threshold: f64,
    /// Frames quieter than this RMS are skipped
    pub min_rms: f64,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            split_hz: 165.0,
            min_hz: 60.0,
            max_hz: 400.0,
            frame_ms: 40,
            voicing_threshold: 0.3,
            min_rms: 0.01,
        }
    }
}

/// Labels a clip by the median pitch of its voiced frames
#[derive(Debug, Clone, Default)]
pub struct PitchClassifier {
    config: PitchConfig,
}

impl PitchClassifier {
    pub fn new(config: PitchConfig) -> Self {
        Self { config }
    }

    /// Median F0 over voiced frames
    pub fn median_pitch(&self, clip: &AudioClip) -> Result<f64, ClassificationFailure> {
        if clip.samples.is_empty() || clip.sample_rate == 0 {
            return Err(ClassificationFailure::EmptyClip);
        }

        let frame_len = (clip.sample_rate as usize * self.config.frame_ms as usize / 1000).max(1);
        let hop = (frame_len / 2).max(1);

        let mut pitches = Vec::new();
        let mut offset = 0;
        while offset + frame_len <= clip.samples.len() {
            let frame = &clip.samples[offset..offset + frame_len];
            if let Some(f0) = self.frame_pitch(frame, clip.sample_rate) {
                pitches.push(f0);
            }
            offset += hop;
        }

        if pitches.is_empty() {
            return Err(ClassificationFailure::Unvoiced);
        }

        pitches.sort_by(|a, b| a.total_cmp(b));
        let mid = pitches.len() / 2;
        let median = if pitches.len() % 2 == 0 {
            (pitches[mid - 1] + pitches[mid]) / 2.0
        } else {
            pitches[mid]
        };

        debug!("{} voiced frames, median F0 {:.1} Hz", pitches.len(), median);
        Ok(median)
    }

    /// F0 of one frame by normalized autocorrelation, `None` if unvoiced
    fn frame_pitch(&self, frame: &[f32], sample_rate: u32) -> Option<f64> {
        let n = frame.len();
        let rms = (frame.iter().map(|&s| (s as f64) * (s as f64)).sum::<f64>() / n as f64).sqrt();
        if rms < self.config.min_rms {
            return None;
        }

        let min_lag = (sample_rate as f64 / self.config.max_hz).floor().max(1.0) as usize;
        let max_lag = ((sample_rate as f64 / self.config.min_hz).ceil() as usize).min(n / 2);
        if max_lag <= min_lag {
            return None;
        }

        let corrs: Vec<f64> = (min_lag..=max_lag)
            .map(|lag| {
                let mut sum = 0.0;
                let mut norm_a = 0.0;
                let mut norm_b = 0.0;

                for i in 0..(n - lag) {
                    let a = frame[i] as f64;
                    let b = frame[i + lag] as f64;
                    sum += a * b;
                    norm_a += a * a;
                    norm_b += b * b;
                }

                if norm_a > 0.0 && norm_b > 0.0 {
                    sum / (norm_a * norm_b).sqrt()
                } else {
                    0.0
                }
            })
            .collect();

        let best_corr = corrs.iter().copied().fold(0.0f64, f64::max);
        if best_corr < self.config.voicing_threshold {
            return None;
        }

        // Shortest lag with a peak close to the best one, avoids octave errors
        let peak = (1..corrs.len().saturating_sub(1))
            .find(|&i| {
                corrs[i] >= OCTAVE_TOLERANCE * best_corr
                    && corrs[i] >= corrs[i - 1]
                    && corrs[i] >= corrs[i + 1]
            })
            .or_else(|| corrs.iter().position(|&c| c == best_corr))?;
        let best_lag = min_lag + peak;

        Some(sample_rate as f64 / best_lag as f64)
    }
}

impl VoiceClassifier for PitchClassifier {
    fn classify(&self, clip: &AudioClip) -> anyhow::Result<VoiceLabel> {
        let f0 = self.median_pitch(clip)?;
        Ok(if f0 >= self.config.split_hz {
            VoiceLabel::Female
        } else {
            VoiceLabel::Male
        })
    }
}
