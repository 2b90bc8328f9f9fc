//! Sample rate resolution and conversion
//!
//! Rate conversion uses linear interpolation, applied to each channel
//! independently with a shared output length.

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::engine::buffer::ChannelBuffer;
use crate::engine::waveform::{denormalize, normalize, Waveform};
use crate::error::{Result, WavelayError};

/// How the output sample rate of an overlay is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetRatePolicy {
    /// Same as `Higher`
    #[default]
    Auto,
    /// Rate of the first input
    Audio1,
    /// Rate of the second input
    Audio2,
    /// `max(rate1, rate2)`
    Higher,
    /// `min(rate1, rate2)`
    Lower,
}

impl TargetRatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetRatePolicy::Auto => "auto",
            TargetRatePolicy::Audio1 => "audio1",
            TargetRatePolicy::Audio2 => "audio2",
            TargetRatePolicy::Higher => "higher",
            TargetRatePolicy::Lower => "lower",
        }
    }
}

impl fmt::Display for TargetRatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetRatePolicy {
    type Err = WavelayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(TargetRatePolicy::Auto),
            "audio1" => Ok(TargetRatePolicy::Audio1),
            "audio2" => Ok(TargetRatePolicy::Audio2),
            "higher" => Ok(TargetRatePolicy::Higher),
            "lower" => Ok(TargetRatePolicy::Lower),
            _ => Err(WavelayError::UnknownRatePolicy {
                value: s.to_string(),
            }),
        }
    }
}

/// Pick the output sample rate for two inputs
pub fn resolve_target_rate(policy: TargetRatePolicy, rate1: u32, rate2: u32) -> u32 {
    match policy {
        TargetRatePolicy::Auto | TargetRatePolicy::Higher => rate1.max(rate2),
        TargetRatePolicy::Lower => rate1.min(rate2),
        TargetRatePolicy::Audio1 => rate1,
        TargetRatePolicy::Audio2 => rate2,
    }
}

/// Number of samples after converting `len` samples from `source_rate` to
/// `target_rate`.
///
/// Computes `round(len * target_rate / source_rate)` (halves round up) in
/// integer arithmetic, so non-integer rate ratios never drift by a sample
/// through intermediate float rounding.
pub fn resampled_length(len: usize, source_rate: u32, target_rate: u32) -> usize {
    let source = source_rate as u128;
    let scaled = len as u128 * target_rate as u128;
    ((scaled + source / 2) / source) as usize
}

/// Resample a planar buffer
///
/// Returns an unmodified copy when the rates already match.
pub fn resample_buffer(
    buffer: &ChannelBuffer,
    source_rate: u32,
    target_rate: u32,
) -> ChannelBuffer {
    if source_rate == target_rate {
        return buffer.clone();
    }

    let target_len = resampled_length(buffer.len(), source_rate, target_rate);
    let step = source_rate as f64 / target_rate as f64;

    debug!(
        "Resampling {} channel(s) {}Hz -> {}Hz: {} -> {} samples",
        buffer.channels(),
        source_rate,
        target_rate,
        buffer.len(),
        target_len
    );

    ChannelBuffer {
        samples: buffer
            .samples
            .iter()
            .map(|channel| resample_linear(channel, step, target_len))
            .collect(),
    }
}

/// Resample a boundary waveform, keeping its 1D/2D/batched layout
///
/// # Errors
/// * `InvalidSampleRate` - if either rate is zero
/// * `InvalidShape` - if the waveform cannot be normalized
pub fn resample_waveform(
    waveform: &Waveform,
    source_rate: u32,
    target_rate: u32,
) -> Result<Waveform> {
    for rate in [source_rate, target_rate] {
        if rate == 0 {
            return Err(WavelayError::InvalidSampleRate { sample_rate: rate });
        }
    }

    if source_rate == target_rate {
        return Ok(waveform.clone());
    }

    let (buffer, shape) = normalize(waveform)?;
    Ok(denormalize(
        resample_buffer(&buffer, source_rate, target_rate),
        shape,
    ))
}

/// Linear interpolation resampling of a single channel
///
/// `step` is the distance in source samples between consecutive output
/// samples. Positions past the final source sample hold its value.
fn resample_linear(samples: &[f32], step: f64, target_len: usize) -> Vec<f32> {
    let Some(&last) = samples.last() else {
        return Vec::new();
    };

    let source_len = samples.len();
    (0..target_len)
        .map(|i| {
            let src_pos = i as f64 * step;
            let src_idx = src_pos.floor() as usize;
            let frac = (src_pos - src_idx as f64) as f32;

            if src_idx + 1 < source_len {
                samples[src_idx] * (1.0 - frac) + samples[src_idx + 1] * frac
            } else {
                last
            }
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(TargetRatePolicy::Auto, 44100 ; "auto picks higher")]
    #[test_case(TargetRatePolicy::Higher, 44100 ; "higher")]
    #[test_case(TargetRatePolicy::Lower, 22050 ; "lower")]
    #[test_case(TargetRatePolicy::Audio1, 22050 ; "audio1")]
    #[test_case(TargetRatePolicy::Audio2, 44100 ; "audio2")]
    fn test_resolve_target_rate(policy: TargetRatePolicy, expected: u32) {
        assert_eq!(resolve_target_rate(policy, 22050, 44100), expected);
    }

    #[test]
    fn test_policy_parse_and_display() {
        for policy in [
            TargetRatePolicy::Auto,
            TargetRatePolicy::Audio1,
            TargetRatePolicy::Audio2,
            TargetRatePolicy::Higher,
            TargetRatePolicy::Lower,
        ] {
            assert_eq!(policy.to_string().parse::<TargetRatePolicy>().unwrap(), policy);
        }
        assert_eq!("  Higher ".parse::<TargetRatePolicy>().unwrap(), TargetRatePolicy::Higher);
        assert!(matches!(
            "fastest".parse::<TargetRatePolicy>(),
            Err(WavelayError::UnknownRatePolicy { .. })
        ));
    }

    #[test]
    fn test_resampled_length_integer_ratio() {
        assert_eq!(resampled_length(44100, 44100, 22050), 22050);
        assert_eq!(resampled_length(100, 22050, 44100), 200);
    }

    // 3 * 22050 / 44100 = 1.5: truncation would give 1
    #[test]
    fn test_resampled_length_rounds_half_up() {
        assert_eq!(resampled_length(3, 44100, 22050), 2);
    }

    // 100 * 48000 / 44100 = 108.84: truncation would give 108
    #[test]
    fn test_resampled_length_non_integer_ratio() {
        assert_eq!(resampled_length(100, 44100, 48000), 109);
        // 1000 * 44100 / 48000 = 918.75
        assert_eq!(resampled_length(1000, 48000, 44100), 919);
        // 1000 * 22050 / 48000 = 459.375
        assert_eq!(resampled_length(1000, 48000, 22050), 459);
    }

    #[test]
    fn test_resampled_length_one_second_is_exact() {
        for (from, to) in [(44100, 48000), (48000, 22050), (8000, 96000)] {
            assert_eq!(resampled_length(from as usize, from, to), to as usize);
        }
    }

    #[test]
    fn test_resample_linear_upsample() {
        let resampled = resample_linear(&[0.0, 1.0, 0.0], 0.5, 6);
        let expected = [0.0, 0.5, 1.0, 0.5, 0.0, 0.0];
        for (actual, expected) in resampled.iter().zip(expected) {
            assert_abs_diff_eq!(*actual, expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_resample_linear_downsample() {
        let samples = [0.0, 0.5, 1.0, 0.5, 0.0, -0.5, -1.0, -0.5];
        let resampled = resample_linear(&samples, 2.0, 4);
        assert_eq!(resampled, vec![0.0, 1.0, 0.0, -1.0]);
    }

    #[test]
    fn test_resample_linear_empty() {
        assert!(resample_linear(&[], 2.0, 0).is_empty());
    }

    #[test]
    fn test_resample_buffer_same_rate_is_identity() {
        let buffer =
            ChannelBuffer::from_channels(vec![vec![0.1, -0.2, 0.3], vec![0.4, 0.5, -0.6]])
                .unwrap();
        assert_eq!(resample_buffer(&buffer, 44100, 44100), buffer);
    }

    #[test]
    fn test_resample_buffer_keeps_channels_aligned() {
        let buffer = ChannelBuffer::from_channels(vec![vec![0.25; 441], vec![-0.25; 441]]).unwrap();
        let resampled = resample_buffer(&buffer, 44100, 48000);

        assert_eq!(resampled.channels(), 2);
        assert_eq!(resampled.len(), 480);
        assert_eq!(resampled.samples[1].len(), 480);
        assert!(resampled.channel(0).iter().all(|&s| (s - 0.25).abs() < 1e-6));
        assert!(resampled.channel(1).iter().all(|&s| (s + 0.25).abs() < 1e-6));
    }

    #[test]
    fn test_resample_waveform_preserves_batch() {
        let waveform = Waveform::Batch(vec![vec![vec![0.5; 100]]]);
        let resampled = resample_waveform(&waveform, 22050, 44100).unwrap();

        match resampled {
            Waveform::Batch(batch) => {
                assert_eq!(batch.len(), 1);
                assert_eq!(batch[0].len(), 1);
                assert_eq!(batch[0][0].len(), 200);
            }
            other => panic!("expected batched waveform, got {:?}", other.shape()),
        }
    }

    #[test]
    fn test_resample_waveform_preserves_flat() {
        let waveform = Waveform::Samples(vec![0.5; 480]);
        let resampled = resample_waveform(&waveform, 48000, 16000).unwrap();
        assert_eq!(resampled, Waveform::Samples(vec![0.5; 160]));
    }

    #[test]
    fn test_resample_waveform_same_rate_is_bit_identical() {
        let waveform = Waveform::Channels(vec![vec![0.123_456_7, -0.987_654_3, 1.0e-7]]);
        let resampled = resample_waveform(&waveform, 32000, 32000).unwrap();
        assert_eq!(resampled, waveform);
    }

    #[test]
    fn test_resample_waveform_rejects_zero_rate() {
        let waveform = Waveform::Samples(vec![0.0; 10]);
        assert!(matches!(
            resample_waveform(&waveform, 0, 44100),
            Err(WavelayError::InvalidSampleRate { sample_rate: 0 })
        ));
    }
}
