//! Length alignment, blending and clip prevention
//!
//! These are the last three overlay stages. All of them operate on buffers
//! that already share a channel count.

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::engine::buffer::ChannelBuffer;
use crate::error::{Result, WavelayError};

/// Largest absolute amplitude allowed in an overlay result
pub const PEAK_LIMIT: f32 = 1.0;

// ============================================================================
// Blend Mode
// ============================================================================

/// Elementwise combination applied to two aligned buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// `w1 + w2`
    Add,
    /// `(w1 + w2) / 2`
    Average,
    /// `w1 * ratio + w2 * (1 - ratio)`
    #[default]
    Mix,
}

impl BlendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlendMode::Add => "add",
            BlendMode::Average => "average",
            BlendMode::Mix => "mix",
        }
    }

    /// Combine a single pair of samples
    #[inline]
    pub fn apply(&self, a: f32, b: f32, mix_ratio: f32) -> f32 {
        match self {
            BlendMode::Add => a + b,
            BlendMode::Average => (a + b) / 2.0,
            BlendMode::Mix => a * mix_ratio + b * (1.0 - mix_ratio),
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlendMode {
    type Err = WavelayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(BlendMode::Add),
            "average" => Ok(BlendMode::Average),
            "mix" => Ok(BlendMode::Mix),
            _ => Err(WavelayError::UnknownBlendMode {
                value: s.to_string(),
            }),
        }
    }
}

// ============================================================================
// Stages
// ============================================================================

/// Append trailing silence to every channel until it holds `length` samples
///
/// Buffers already at or beyond `length` are returned unchanged.
pub fn pad_to_length(buffer: ChannelBuffer, length: usize) -> ChannelBuffer {
    let mut samples = buffer.into_channels();
    for channel in &mut samples {
        if channel.len() < length {
            channel.resize(length, 0.0);
        }
    }
    ChannelBuffer { samples }
}

/// Zero-pad the shorter buffer so both share the longer length
pub fn align_lengths(
    first: ChannelBuffer,
    second: ChannelBuffer,
) -> (ChannelBuffer, ChannelBuffer) {
    let max_length = first.len().max(second.len());
    if first.len() != second.len() {
        debug!(
            "Padding to {} samples (audio1: {}, audio2: {})",
            max_length,
            first.len(),
            second.len()
        );
    }
    (
        pad_to_length(first, max_length),
        pad_to_length(second, max_length),
    )
}

/// Blend two buffers of identical shape
///
/// `mix_ratio` is only consulted by [`BlendMode::Mix`].
pub fn blend(
    first: &ChannelBuffer,
    second: &ChannelBuffer,
    mode: BlendMode,
    mix_ratio: f32,
) -> ChannelBuffer {
    debug_assert_eq!(first.channels(), second.channels());
    debug_assert_eq!(first.len(), second.len());

    ChannelBuffer {
        samples: first
            .samples
            .iter()
            .zip(&second.samples)
            .map(|(a, b)| {
                a.iter()
                    .zip(b)
                    .map(|(&x, &y)| mode.apply(x, y, mix_ratio))
                    .collect()
            })
            .collect(),
    }
}

/// Scale the whole buffer down uniformly if its peak exceeds [`PEAK_LIMIT`]
///
/// Every sample is divided by the peak, so relative channel balance is
/// kept. Returns the linear gain that was applied (1.0 when untouched).
///
/// The buffer must be finite: an infinite peak would turn that sample into
/// NaN and every other sample into zero.
pub fn prevent_clipping(buffer: &mut ChannelBuffer) -> f32 {
    let peak = buffer.peak();
    if peak <= PEAK_LIMIT {
        return 1.0;
    }

    debug!(
        "Peak {:.4} ({:+.2} dBFS) exceeds limit, normalizing",
        peak,
        buffer.peak_db()
    );

    for channel in &mut buffer.samples {
        for sample in channel.iter_mut() {
            *sample /= peak;
        }
    }

    1.0 / peak
}
