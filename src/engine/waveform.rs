//! Boundary Waveform Forms
//!
//! Callers hand waveforms over in one of three layouts: a bare sample
//! sequence, a `channels x samples` matrix, or that matrix wrapped in a
//! batch dimension of size one. The pipeline only ever sees the planar form;
//! [`normalize`] and [`denormalize`] convert at the edges and remember which
//! layout to give back.

use serde::{Deserialize, Serialize};

use crate::engine::buffer::ChannelBuffer;
use crate::error::{Result, WavelayError};

/// Sample data as supplied by the host
///
/// Serialized as plain nested arrays, so `[0.1, 0.2]`, `[[0.1, 0.2]]` and
/// `[[[0.1, 0.2]]]` deserialize to the three variants respectively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Waveform {
    /// Bare sample sequence, implicitly one channel
    Samples(Vec<f32>),
    /// `channels x samples`
    Channels(Vec<Vec<f32>>),
    /// `batch x channels x samples`; the batch dimension must be 1
    Batch(Vec<Vec<Vec<f32>>>),
}

/// Which boundary layout a waveform arrived in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaveformShape {
    /// 1D
    Flat,
    /// 2D
    Planar,
    /// 3D with a leading batch of one
    Batched,
}

impl Waveform {
    /// Layout of this waveform
    pub fn shape(&self) -> WaveformShape {
        match self {
            Waveform::Samples(_) => WaveformShape::Flat,
            Waveform::Channels(_) => WaveformShape::Planar,
            Waveform::Batch(_) => WaveformShape::Batched,
        }
    }

    /// Size of the last (samples) axis
    pub fn num_samples(&self) -> usize {
        match self {
            Waveform::Samples(samples) => samples.len(),
            Waveform::Channels(channels) => channels.first().map(Vec::len).unwrap_or(0),
            Waveform::Batch(batch) => batch
                .first()
                .and_then(|channels| channels.first())
                .map(Vec::len)
                .unwrap_or(0),
        }
    }

    /// Number of channels, ignoring any batch dimension
    pub fn num_channels(&self) -> usize {
        match self {
            Waveform::Samples(_) => 1,
            Waveform::Channels(channels) => channels.len(),
            Waveform::Batch(batch) => batch.first().map(Vec::len).unwrap_or(0),
        }
    }
}

impl From<ChannelBuffer> for Waveform {
    fn from(buffer: ChannelBuffer) -> Self {
        Waveform::Channels(buffer.into_channels())
    }
}

/// Reduce any boundary waveform to the canonical planar buffer
///
/// # Errors
/// * `InvalidShape` - batch dimension other than 1, no channels, or ragged channels
pub fn normalize(waveform: &Waveform) -> Result<(ChannelBuffer, WaveformShape)> {
    let shape = waveform.shape();
    let buffer = match waveform {
        Waveform::Samples(samples) => ChannelBuffer::from_channels(vec![samples.clone()])?,
        Waveform::Channels(channels) => ChannelBuffer::from_channels(channels.clone())?,
        Waveform::Batch(batch) => match batch.as_slice() {
            [channels] => ChannelBuffer::from_channels(channels.clone())?,
            _ => {
                return Err(WavelayError::InvalidShape {
                    reason: format!("batch dimension must be 1, got {}", batch.len()),
                })
            }
        },
    };
    Ok((buffer, shape))
}

/// Restore a planar buffer to the given boundary layout
///
/// A multichannel buffer cannot be flattened, so `Flat` only yields
/// `Samples` when the buffer is mono and falls back to `Channels` otherwise.
pub fn denormalize(buffer: ChannelBuffer, shape: WaveformShape) -> Waveform {
    match shape {
        WaveformShape::Flat if buffer.channels() == 1 => {
            let mut channels = buffer.into_channels();
            Waveform::Samples(channels.pop().unwrap_or_default())
        }
        WaveformShape::Flat | WaveformShape::Planar => Waveform::Channels(buffer.into_channels()),
        WaveformShape::Batched => Waveform::Batch(vec![buffer.into_channels()]),
    }
}

/// A waveform paired with its sample rate; the unit exchanged with the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioClip {
    pub waveform: Waveform,
    /// Samples per second
    pub sample_rate: u32,
}

impl AudioClip {
    pub fn new(waveform: Waveform, sample_rate: u32) -> Self {
        Self {
            waveform,
            sample_rate,
        }
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        crate::engine::duration::duration_secs(self)
    }
}
