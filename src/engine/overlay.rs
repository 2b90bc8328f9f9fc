//! Two-track overlay
//!
//! Runs the full pipeline over a pair of clips:
//! rate resolution → resampling → channel reconciliation → length
//! alignment → blending → clip prevention.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::engine::buffer::ChannelBuffer;
use crate::engine::channels::reconcile_channels;
use crate::engine::mixer::{align_lengths, blend, prevent_clipping, BlendMode};
use crate::engine::resample::{resample_buffer, resolve_target_rate, TargetRatePolicy};
use crate::engine::waveform::{denormalize, normalize, AudioClip, WaveformShape};
use crate::error::{Result, WavelayError};

/// Default mix ratio (equal blend)
pub const DEFAULT_MIX_RATIO: f32 = 0.5;

/// Overlay parameters
///
/// Deserializes from JSON such as
/// `{"blend_mode": "add", "mix_ratio": 0.5, "target_rate_policy": "lower"}`;
/// omitted fields take their defaults and unknown keys are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    pub blend_mode: BlendMode,
    /// Weight of audio1 in `mix` mode; audio2 gets `1 - mix_ratio`
    pub mix_ratio: f32,
    pub target_rate_policy: TargetRatePolicy,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            blend_mode: BlendMode::Mix,
            mix_ratio: DEFAULT_MIX_RATIO,
            target_rate_policy: TargetRatePolicy::Auto,
        }
    }
}

impl OverlayConfig {
    pub fn new(
        blend_mode: BlendMode,
        mix_ratio: f32,
        target_rate_policy: TargetRatePolicy,
    ) -> Self {
        Self {
            blend_mode,
            mix_ratio,
            target_rate_policy,
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that `mix_ratio` is a finite value in [0.0, 1.0]
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.mix_ratio) {
            return Err(WavelayError::InvalidMixRatio {
                mix_ratio: self.mix_ratio,
            });
        }
        Ok(())
    }
}

/// Stateless overlay pipeline
///
/// Holds nothing between calls, so one engine can serve concurrent callers.
///
/// # Example
/// ```
/// use wavelay::engine::{AudioClip, OverlayConfig, OverlayEngine, Waveform};
///
/// let a = AudioClip::new(Waveform::Samples(vec![0.5; 100]), 44100);
/// let b = AudioClip::new(Waveform::Samples(vec![0.25; 50]), 44100);
///
/// let mixed = OverlayEngine::new().overlay(&a, &b, &OverlayConfig::default()).unwrap();
/// assert_eq!(mixed.sample_rate, 44100);
/// assert_eq!(mixed.waveform.num_samples(), 100);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayEngine;

impl OverlayEngine {
    pub fn new() -> Self {
        Self
    }

    /// Mix two clips into a new clip
    ///
    /// The output is batched if either input was batched, a bare sample
    /// sequence if both inputs were one and the result is mono, and planar
    /// (`channels x samples`) otherwise. Inputs are never modified.
    ///
    /// # Errors
    /// * `InvalidMixRatio` - `config.mix_ratio` outside [0.0, 1.0]
    /// * `InvalidSampleRate` - either clip has a zero sample rate
    /// * `InvalidShape` - either waveform cannot be normalized
    /// * `NonFiniteSamples` - either waveform contains NaN or Inf, or
    ///   blending overflowed `f32`
    /// * `IncompatibleChannels` - channel counts cannot be reconciled
    pub fn overlay(
        &self,
        audio1: &AudioClip,
        audio2: &AudioClip,
        config: &OverlayConfig,
    ) -> Result<AudioClip> {
        config.validate()?;
        let (buffer1, shape1) = prepare_input(audio1)?;
        let (buffer2, shape2) = prepare_input(audio2)?;

        let final_rate =
            resolve_target_rate(config.target_rate_policy, audio1.sample_rate, audio2.sample_rate);
        debug!(
            "Overlay {}Hz + {}Hz -> {}Hz (policy: {}, blend: {})",
            audio1.sample_rate,
            audio2.sample_rate,
            final_rate,
            config.target_rate_policy,
            config.blend_mode
        );

        let buffer1 = resample_buffer(&buffer1, audio1.sample_rate, final_rate);
        let buffer2 = resample_buffer(&buffer2, audio2.sample_rate, final_rate);

        let (buffer1, buffer2) = reconcile_channels(buffer1, buffer2)?;
        let (buffer1, buffer2) = align_lengths(buffer1, buffer2);

        let mut mixed = blend(&buffer1, &buffer2, config.blend_mode, config.mix_ratio);
        if !mixed.is_finite() {
            return Err(WavelayError::NonFiniteSamples);
        }
        prevent_clipping(&mut mixed);

        let output_shape = match (shape1, shape2) {
            (WaveformShape::Batched, _) | (_, WaveformShape::Batched) => WaveformShape::Batched,
            (WaveformShape::Flat, WaveformShape::Flat) => WaveformShape::Flat,
            _ => WaveformShape::Planar,
        };

        debug!(
            "Overlay result: {} channel(s), {} samples",
            mixed.channels(),
            mixed.len()
        );

        Ok(AudioClip::new(denormalize(mixed, output_shape), final_rate))
    }
}

/// Validate a clip and reduce it to the canonical buffer
fn prepare_input(clip: &AudioClip) -> Result<(ChannelBuffer, WaveformShape)> {
    if clip.sample_rate == 0 {
        return Err(WavelayError::InvalidSampleRate {
            sample_rate: clip.sample_rate,
        });
    }

    let (buffer, shape) = normalize(&clip.waveform)?;
    if !buffer.is_finite() {
        return Err(WavelayError::NonFiniteSamples);
    }
    Ok((buffer, shape))
}

/// Convenience wrapper around [`OverlayEngine::overlay`]
pub fn overlay(
    audio1: &AudioClip,
    audio2: &AudioClip,
    config: &OverlayConfig,
) -> Result<AudioClip> {
    OverlayEngine::new().overlay(audio1, audio2, config)
}
