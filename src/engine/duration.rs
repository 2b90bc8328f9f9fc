//! Clip duration

use crate::engine::waveform::AudioClip;

/// Duration of a clip in seconds: samples on the last axis divided by rate.
///
/// The sample rate is assumed to be positive; a zero rate yields an
/// infinite or NaN result rather than an error.
pub fn duration_secs(clip: &AudioClip) -> f64 {
    clip.waveform.num_samples() as f64 / clip.sample_rate as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::waveform::Waveform;
    use approx::assert_relative_eq;

    #[test]
    fn test_one_second_mono() {
        let clip = AudioClip::new(Waveform::Samples(vec![0.0; 44100]), 44100);
        assert_relative_eq!(duration_secs(&clip), 1.0);
    }

    #[test]
    fn test_uses_sample_axis_not_channels() {
        let clip = AudioClip::new(Waveform::Channels(vec![vec![0.0; 24000]; 2]), 48000);
        assert_relative_eq!(duration_secs(&clip), 0.5);
    }

    #[test]
    fn test_batched_clip() {
        let clip = AudioClip::new(Waveform::Batch(vec![vec![vec![0.0; 22050]]]), 44100);
        assert_relative_eq!(clip.duration_secs(), 0.5);
    }

    #[test]
    fn test_empty_clip_is_zero() {
        let clip = AudioClip::new(Waveform::Samples(Vec::new()), 16000);
        assert_eq!(duration_secs(&clip), 0.0);
    }
}
