//! Voice classifier seam

use parley_core::{AudioClip, VoiceLabel};
use tracing::{debug, warn};

/// Per-clip voice classifier.
///
/// Clips arrive mono, resampled and peak-normalized.
pub trait VoiceClassifier: Send + Sync {
    fn classify(&self, clip: &AudioClip) -> anyhow::Result<VoiceLabel>;
}

impl<F> VoiceClassifier for F
where
    F: Fn(&AudioClip) -> anyhow::Result<VoiceLabel> + Send + Sync,
{
    fn classify(&self, clip: &AudioClip) -> anyhow::Result<VoiceLabel> {
        self(clip)
    }
}

/// Classify one clip, never failing.
///
/// Clips shorter than `min_clip_secs` are `Unknown` without calling the
/// classifier, and classifier errors degrade to `Unknown`.
pub fn classify_guarded(
    classifier: &dyn VoiceClassifier,
    clip: &AudioClip,
    min_clip_secs: f64,
) -> VoiceLabel {
    if clip.duration() < min_clip_secs {
        debug!(
            "Clip at {:.2}s too short ({:.2}s), voting unknown",
            clip.start,
            clip.duration()
        );
        return VoiceLabel::Unknown;
    }

    match classifier.classify(clip) {
        Ok(label) => label,
        Err(e) => {
            warn!("Classification failed for clip at {:.2}s: {:#}", clip.start, e);
            VoiceLabel::Unknown
        }
    }
}
