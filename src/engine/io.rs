//! WAV file I/O for the host binary
//!
//! Decodes WAV files into planar `AudioClip`s and encodes results back.
//! The overlay core never touches files; only `wavelay-cli` calls these.
//! Clips keep their file's native sample rate.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::debug;

use crate::engine::waveform::{normalize, AudioClip, Waveform};
use crate::error::{Result, WavelayError};

/// Export format configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportFormat {
    /// Bit depth: 16, 24 (integer PCM) or 32 (float). Default: 24
    pub bit_depth: u16,
}

impl Default for ExportFormat {
    fn default() -> Self {
        ExportFormat { bit_depth: 24 }
    }
}

impl ExportFormat {
    pub fn new(bit_depth: u16) -> Self {
        ExportFormat { bit_depth }
    }
}

/// Read a WAV file into a planar clip at its native sample rate
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidAudio` - If the file is not a valid WAV file
/// * `UnsupportedFormat` - If the integer bit depth is not 8, 16, 24 or 32
pub fn import_clip(path: &Path) -> Result<AudioClip> {
    if !path.exists() {
        return Err(WavelayError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let reader = WavReader::open(path).map_err(|e| wav_error("Failed to open WAV file", e))?;

    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(WavelayError::InvalidAudio {
            reason: "WAV header declares zero channels".to_string(),
            source: None,
        });
    }

    let interleaved = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;
    debug!(
        "Imported {}: {} channel(s), {}Hz, {}-bit {:?}, {} frames",
        path.display(),
        channels,
        spec.sample_rate,
        spec.bits_per_sample,
        spec.sample_format,
        interleaved.len() / channels
    );

    Ok(AudioClip::new(
        Waveform::Channels(deinterleave(&interleaved, channels)),
        spec.sample_rate,
    ))
}

/// Write a clip to a WAV file
///
/// # Errors
/// * `InvalidShape` - If the clip's waveform cannot be normalized
/// * `UnsupportedFormat` - If the bit depth is not 16, 24 or 32
/// * `Io` - If the file cannot be written
pub fn export_clip(clip: &AudioClip, path: &Path, format: ExportFormat) -> Result<()> {
    if !matches!(format.bit_depth, 16 | 24 | 32) {
        return Err(WavelayError::UnsupportedFormat {
            format: format!("{}-bit audio (only 16, 24, 32 supported)", format.bit_depth),
        });
    }

    let (buffer, _) = normalize(&clip.waveform)?;
    let channels = u16::try_from(buffer.channels()).map_err(|_| WavelayError::UnsupportedFormat {
        format: format!("{}-channel audio", buffer.channels()),
    })?;

    let spec = WavSpec {
        channels,
        sample_rate: clip.sample_rate,
        bits_per_sample: format.bit_depth,
        sample_format: if format.bit_depth == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };

    let mut writer =
        WavWriter::create(path, spec).map_err(|e| wav_error("Failed to create WAV file", e))?;

    for sample in interleave(&buffer.samples) {
        let written = match format.bit_depth {
            16 => writer.write_sample((sample * 32767.0).clamp(-32768.0, 32767.0) as i16),
            // 24-bit stored as i32 in hound
            24 => writer.write_sample((sample * 8388607.0).clamp(-8388608.0, 8388607.0) as i32),
            _ => writer.write_sample(sample),
        };
        written.map_err(|e| wav_error("Failed to write sample", e))?;
    }

    writer
        .finalize()
        .map_err(|e| wav_error("Failed to finalize WAV file", e))?;

    debug!(
        "Exported {}: {} channel(s), {}Hz, {}-bit",
        path.display(),
        channels,
        clip.sample_rate,
        format.bit_depth
    );
    Ok(())
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn wav_error(context: &str, error: hound::Error) -> WavelayError {
    match error {
        hound::Error::IoError(io) => WavelayError::Io(io),
        other => WavelayError::InvalidAudio {
            reason: format!("{}: {}", context, other),
            source: Some(Box::new(other)),
        },
    }
}

/// Read samples from WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    let samples: std::result::Result<Vec<f32>, hound::Error> = match (sample_format, bits_per_sample)
    {
        (SampleFormat::Float, _) => reader.samples::<f32>().collect(),
        (SampleFormat::Int, 8) => reader
            .samples::<i8>()
            .map(|s| s.map(|v| v as f32 / 128.0))
            .collect(),
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32768.0))
            .collect(),
        // 24-bit stored as i32 in hound
        (SampleFormat::Int, 24) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 8388608.0))
            .collect(),
        (SampleFormat::Int, 32) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 2147483648.0))
            .collect(),
        (SampleFormat::Int, bits) => {
            return Err(WavelayError::UnsupportedFormat {
                format: format!("{}-bit integer audio", bits),
            })
        }
    };

    samples.map_err(|e| wav_error("Failed to read samples", e))
}

/// De-interleave samples from [L,R,L,R,...] to [[L,L,...], [R,R,...]]
fn deinterleave(samples: &[f32], channels: usize) -> Vec<Vec<f32>> {
    let frames = samples.len() / channels;
    let mut result = vec![Vec::with_capacity(frames); channels];

    for frame in samples.chunks_exact(channels) {
        for (ch, &sample) in frame.iter().enumerate() {
            result[ch].push(sample);
        }
    }

    result
}

/// Interleave channels from [[L,L,...], [R,R,...]] to [L,R,L,R,...]
fn interleave(channels: &[Vec<f32>]) -> Vec<f32> {
    let frames = channels.first().map(Vec::len).unwrap_or(0);
    let mut result = Vec::with_capacity(frames * channels.len());

    for frame in 0..frames {
        for channel in channels {
            result.push(channel[frame]);
        }
    }

    result
}

// ============================================================================
// Tests
// ============================================================================
