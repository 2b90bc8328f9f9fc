//! Audio Engine Module
//!
//! In-memory audio core:
//! - Boundary waveform forms and the canonical channel buffer
//! - Clip duration
//! - Two-track overlay (resampling, channel reconciliation, mixing)
//! - WAV file I/O for the host binary

pub mod buffer;
pub mod channels;
pub mod duration;
pub mod io;
pub mod mixer;
pub mod overlay;
pub mod resample;
pub mod waveform;

pub use buffer::{linear_to_db, ChannelBuffer, ChannelLayout};
pub use channels::{reconcile_channels, upmix_to_stereo};
pub use duration::duration_secs;
pub use io::{export_clip, import_clip, ExportFormat};
pub use mixer::{align_lengths, blend, pad_to_length, prevent_clipping, BlendMode, PEAK_LIMIT};
pub use overlay::{overlay, OverlayConfig, OverlayEngine, DEFAULT_MIX_RATIO};
pub use resample::{
    resample_buffer, resample_waveform, resampled_length, resolve_target_rate, TargetRatePolicy,
};
pub use waveform::{denormalize, normalize, AudioClip, Waveform, WaveformShape};
