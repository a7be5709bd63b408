//! Plurality voting of per-clip labels

use parley_core::{AudioClip, VoiceLabel};

use crate::classifier::{classify_guarded, VoiceClassifier};

/// Per-speaker label counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub male: usize,
    pub female: usize,
    pub unknown: usize,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, label: VoiceLabel) {
        match label {
            VoiceLabel::Male => self.male += 1,
            VoiceLabel::Female => self.female += 1,
            VoiceLabel::Unknown => self.unknown += 1,
        }
    }

    pub fn count(&self, label: VoiceLabel) -> usize {
        match label {
            VoiceLabel::Male => self.male,
            VoiceLabel::Female => self.female,
            VoiceLabel::Unknown => self.unknown,
        }
    }

    pub fn total(&self) -> usize {
        self.male + self.female + self.unknown
    }

    /// Label with the most votes.
    ///
    /// Ties resolve in `VoiceLabel::PRIORITY` order (male, female, unknown);
    /// an empty tally is `Unknown`.
    pub fn winner(&self) -> VoiceLabel {
        if self.total() == 0 {
            return VoiceLabel::Unknown;
        }

        let mut best = VoiceLabel::PRIORITY[0];
        for label in VoiceLabel::PRIORITY.into_iter().skip(1) {
            if self.count(label) > self.count(best) {
                best = label;
            }
        }
        best
    }
}

impl FromIterator<VoiceLabel> for VoteTally {
    fn from_iter<I: IntoIterator<Item = VoiceLabel>>(iter: I) -> Self {
        let mut tally = Self::new();
        for label in iter {
            tally.record(label);
        }
        tally
    }
}

/// Speaker label from a set of clips, classified one by one.
///
/// Sequential counterpart of the session analyzer's parallel path.
pub fn label_clips(
    clips: &[AudioClip],
    classifier: &dyn VoiceClassifier,
    min_clip_secs: f64,
) -> VoiceLabel {
    clips
        .iter()
        .map(|clip| classify_guarded(classifier, clip, min_clip_secs))
        .collect::<VoteTally>()
        .winner()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(value: f32) -> AudioClip {
        AudioClip {
            samples: vec![value; 16000],
            sample_rate: 16000,
            start: 0.0,
        }
    }

    /// Positive samples vote male, negative female, zero fails
    fn by_sign(clip: &AudioClip) -> anyhow::Result<VoiceLabel> {
        match clip.samples[0] {
            v if v > 0.0 => Ok(VoiceLabel::Male),
            v if v < 0.0 => Ok(VoiceLabel::Female),
            _ => Err(anyhow::anyhow!("no signal")),
        }
    }

    #[test]
    fn test_no_clips_is_unknown() {
        assert_eq!(label_clips(&[], &by_sign, 0.5), VoiceLabel::Unknown);
    }

    #[test]
    fn test_plurality() {
        let clips = vec![clip(1.0), clip(-1.0), clip(1.0)];
        assert_eq!(label_clips(&clips, &by_sign, 0.5), VoiceLabel::Male);

        let clips = vec![clip(-1.0), clip(-1.0), clip(1.0)];
        assert_eq!(label_clips(&clips, &by_sign, 0.5), VoiceLabel::Female);
    }

    #[test]
    fn test_tie_prefers_male_then_female() {
        let clips = vec![clip(-1.0), clip(1.0)];
        assert_eq!(label_clips(&clips, &by_sign, 0.5), VoiceLabel::Male);

        let tally: VoteTally = vec![VoiceLabel::Unknown, VoiceLabel::Female].into_iter().collect();
        assert_eq!(tally.winner(), VoiceLabel::Female);
    }

    #[test]
    fn test_failures_can_win() {
        let clips = vec![clip(0.0), clip(0.0), clip(1.0)];
        assert_eq!(label_clips(&clips, &by_sign, 0.5), VoiceLabel::Unknown);
    }

    #[test]
    fn test_tally_counts() {
        let tally: VoteTally = vec![VoiceLabel::Male, VoiceLabel::Male, VoiceLabel::Female]
            .into_iter()
            .collect();
        assert_eq!(tally.count(VoiceLabel::Male), 2);
        assert_eq!(tally.total(), 3);
        assert_eq!(tally.winner(), VoiceLabel::Male);
    }
}
