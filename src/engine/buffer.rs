//! Canonical Channel Buffer
//!
//! Every pipeline stage works on a `ChannelBuffer`: non-interleaved 32-bit
//! float samples laid out as `channels x samples`. Boundary waveforms are
//! converted into this form on entry (see `waveform.rs`).

use crate::error::{Result, WavelayError};

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert linear amplitude to decibels
///
/// # Returns
/// Value in decibels. Returns -f32::INFINITY for zero input.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

// ============================================================================
// Channel Layout
// ============================================================================

/// Channel configurations the overlay pipeline knows how to reconcile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    /// Single channel (mono)
    Mono,
    /// Two channels (stereo: left, right)
    Stereo,
}

impl ChannelLayout {
    /// Returns the number of channels for this layout
    pub fn num_channels(&self) -> usize {
        match self {
            ChannelLayout::Mono => 1,
            ChannelLayout::Stereo => 2,
        }
    }

    /// Create a ChannelLayout from a channel count
    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(ChannelLayout::Mono),
            2 => Some(ChannelLayout::Stereo),
            _ => None,
        }
    }
}

// ============================================================================
// Channel Buffer
// ============================================================================

/// Planar audio buffer in canonical `channels x samples` form
///
/// A buffer built through [`ChannelBuffer::from_channels`] always has at
/// least one channel and every channel holds the same number of samples.
///
/// # Example
/// ```
/// use wavelay::engine::ChannelBuffer;
///
/// let buffer = ChannelBuffer::new(2, 100);
/// assert_eq!(buffer.channels(), 2);
/// assert_eq!(buffer.len(), 100);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelBuffer {
    /// Sample data: outer Vec is channels, inner Vec is samples
    pub samples: Vec<Vec<f32>>,
}

impl ChannelBuffer {
    /// Create a silent buffer with the given channel and sample counts
    pub fn new(num_channels: usize, num_samples: usize) -> Self {
        Self {
            samples: vec![vec![0.0_f32; num_samples]; num_channels],
        }
    }

    /// Build a buffer from per-channel sample vectors
    ///
    /// # Errors
    /// * `InvalidShape` - if there are no channels or the channels differ in length
    pub fn from_channels(samples: Vec<Vec<f32>>) -> Result<Self> {
        let Some(first) = samples.first() else {
            return Err(WavelayError::InvalidShape {
                reason: "waveform has no channels".to_string(),
            });
        };

        let expected = first.len();
        if let Some((index, ragged)) = samples
            .iter()
            .enumerate()
            .find(|(_, ch)| ch.len() != expected)
        {
            return Err(WavelayError::InvalidShape {
                reason: format!(
                    "channel {} has {} samples, expected {}",
                    index,
                    ragged.len(),
                    expected
                ),
            });
        }

        Ok(Self { samples })
    }

    /// Get the number of channels
    #[inline]
    pub fn channels(&self) -> usize {
        self.samples.len()
    }

    /// Get the number of samples per channel
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.first().map(|ch| ch.len()).unwrap_or(0)
    }

    /// Check if the buffer is empty (no samples)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the channel layout, if it is one the pipeline can upmix
    pub fn channel_layout(&self) -> Option<ChannelLayout> {
        ChannelLayout::from_count(self.channels())
    }

    /// Get immutable access to a channel's samples
    ///
    /// # Panics
    /// Panics if the channel index is out of bounds
    #[inline]
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.samples[index]
    }

    /// Check if all samples are finite (not NaN or Infinity)
    pub fn is_finite(&self) -> bool {
        self.samples
            .iter()
            .flat_map(|ch| ch.iter())
            .all(|s| s.is_finite())
    }

    /// Largest absolute sample value across all channels (linear)
    ///
    /// Returns 0.0 for empty buffers.
    pub fn peak(&self) -> f32 {
        self.samples
            .iter()
            .flat_map(|channel| channel.iter())
            .map(|&s| s.abs())
            .fold(0.0_f32, f32::max)
    }

    /// Peak level in dB. Returns -f32::INFINITY for silent or empty buffers.
    pub fn peak_db(&self) -> f32 {
        linear_to_db(self.peak())
    }

    /// Consume the buffer and return its channel vectors
    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.samples
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_to_db() {
        assert!((linear_to_db(1.0) - 0.0).abs() < 1e-6);
        assert!((linear_to_db(0.5) - (-6.0206)).abs() < 1e-3);
        assert!(linear_to_db(0.0).is_infinite() && linear_to_db(0.0).is_sign_negative());
    }

    #[test]
    fn test_channel_layout() {
        assert_eq!(ChannelLayout::Mono.num_channels(), 1);
        assert_eq!(ChannelLayout::Stereo.num_channels(), 2);
        assert_eq!(ChannelLayout::from_count(1), Some(ChannelLayout::Mono));
        assert_eq!(ChannelLayout::from_count(2), Some(ChannelLayout::Stereo));
        assert_eq!(ChannelLayout::from_count(3), None);
    }

    #[test]
    fn test_buffer_new() {
        let buffer = ChannelBuffer::new(2, 1000);
        assert_eq!(buffer.channels(), 2);
        assert_eq!(buffer.len(), 1000);
        assert_eq!(buffer.channel_layout(), Some(ChannelLayout::Stereo));
        assert_eq!(buffer.peak(), 0.0);
    }

    #[test]
    fn test_from_channels_rejects_ragged() {
        let result = ChannelBuffer::from_channels(vec![vec![0.0; 10], vec![0.0; 9]]);
        assert!(matches!(result, Err(WavelayError::InvalidShape { .. })));
    }

    #[test]
    fn test_from_channels_rejects_no_channels() {
        let result = ChannelBuffer::from_channels(Vec::new());
        assert!(matches!(result, Err(WavelayError::InvalidShape { .. })));
    }

    #[test]
    fn test_from_channels_allows_empty_channels() {
        let buffer = ChannelBuffer::from_channels(vec![Vec::new(), Vec::new()]).unwrap();
        assert_eq!(buffer.channels(), 2);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_peak_uses_absolute_value() {
        let buffer =
            ChannelBuffer::from_channels(vec![vec![0.1, -0.8, 0.3], vec![0.5, 0.2, 0.0]])
                .unwrap();
        assert_eq!(buffer.peak(), 0.8);
        assert!((buffer.peak_db() - linear_to_db(0.8)).abs() < 1e-6);
    }

    #[test]
    fn test_is_finite() {
        let buffer = ChannelBuffer::from_channels(vec![vec![0.5; 100]]).unwrap();
        assert!(buffer.is_finite());

        let buffer_nan = ChannelBuffer::from_channels(vec![vec![f32::NAN; 100]]).unwrap();
        assert!(!buffer_nan.is_finite());

        let buffer_inf = ChannelBuffer::from_channels(vec![vec![f32::INFINITY; 100]]).unwrap();
        assert!(!buffer_inf.is_finite());
    }
}
