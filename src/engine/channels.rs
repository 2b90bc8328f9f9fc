//! Channel reconciliation
//!
//! Brings two buffers to the same channel count before mixing. The only
//! conversion performed is mono to stereo upmixing; every other mismatch is
//! rejected.

use log::debug;

use crate::engine::buffer::{ChannelBuffer, ChannelLayout};
use crate::error::{Result, WavelayError};

/// Duplicate a mono buffer's channel into left and right
pub fn upmix_to_stereo(buffer: ChannelBuffer) -> ChannelBuffer {
    let mut samples = buffer.into_channels();
    if let Some(mono) = samples.first().cloned() {
        samples.push(mono);
    }
    ChannelBuffer { samples }
}

/// Give both buffers the same channel count
///
/// # Errors
/// * `IncompatibleChannels` - counts differ and are not a mono/stereo pair
pub fn reconcile_channels(
    first: ChannelBuffer,
    second: ChannelBuffer,
) -> Result<(ChannelBuffer, ChannelBuffer)> {
    let (channels1, channels2) = (first.channels(), second.channels());
    if channels1 == channels2 {
        return Ok((first, second));
    }

    match (first.channel_layout(), second.channel_layout()) {
        (Some(ChannelLayout::Mono), Some(ChannelLayout::Stereo)) => {
            debug!("Upmixing audio1 from mono to stereo");
            Ok((upmix_to_stereo(first), second))
        }
        (Some(ChannelLayout::Stereo), Some(ChannelLayout::Mono)) => {
            debug!("Upmixing audio2 from mono to stereo");
            Ok((first, upmix_to_stereo(second)))
        }
        _ => Err(WavelayError::IncompatibleChannels {
            channels1,
            channels2,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mono(samples: Vec<f32>) -> ChannelBuffer {
        ChannelBuffer::from_channels(vec![samples]).unwrap()
    }

    #[test]
    fn test_matching_counts_untouched() {
        let a = ChannelBuffer::new(3, 10);
        let b = ChannelBuffer::new(3, 20);
        let (a2, b2) = reconcile_channels(a.clone(), b.clone()).unwrap();
        assert_eq!(a2, a);
        assert_eq!(b2, b);
    }

    #[test]
    fn test_upmix_first() {
        let (a, b) = reconcile_channels(mono(vec![0.1, 0.2]), ChannelBuffer::new(2, 2)).unwrap();
        assert_eq!(a.channels(), 2);
        assert_eq!(a.channel(0), a.channel(1));
        assert_eq!(a.channel(1), &[0.1, 0.2]);
        assert_eq!(b.channels(), 2);
    }

    #[test]
    fn test_upmix_second() {
        let (a, b) = reconcile_channels(ChannelBuffer::new(2, 2), mono(vec![0.3, -0.4])).unwrap();
        assert_eq!(a.channels(), 2);
        assert_eq!(b.samples, vec![vec![0.3, -0.4], vec![0.3, -0.4]]);
    }

    #[test]
    fn test_mono_vs_three_channels_fails() {
        let err = reconcile_channels(mono(vec![0.0]), ChannelBuffer::new(3, 1)).unwrap_err();
        assert!(matches!(
            err,
            WavelayError::IncompatibleChannels {
                channels1: 1,
                channels2: 3
            }
        ));
    }

    #[test]
    fn test_stereo_vs_surround_fails() {
        let err = reconcile_channels(ChannelBuffer::new(6, 1), ChannelBuffer::new(2, 1)).unwrap_err();
        assert!(matches!(
            err,
            WavelayError::IncompatibleChannels {
                channels1: 6,
                channels2: 2
            }
        ));
    }
}
