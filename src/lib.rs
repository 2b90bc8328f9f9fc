//! Wavelay - Waveform Duration and Overlay Mixing
//!
//! Wavelay operates on already-decoded PCM buffers supplied by a host:
//! 1. Duration - sample count divided by sample rate
//! 2. Overlay - mixes two clips of possibly different rates, channel
//!    counts and lengths into one clip
//!
//! # Pipeline
//!
//! An overlay runs six stages over a canonical `channels x samples` buffer:
//! target rate resolution, linear resampling, mono/stereo reconciliation,
//! zero-padding, blending, and peak-based clip prevention.

pub mod cli;
pub mod engine;
pub mod error;

pub use engine::{duration_secs, overlay, AudioClip, OverlayConfig, OverlayEngine, Waveform};
pub use error::{Result, WavelayError};
