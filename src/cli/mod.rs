//! CLI Module
//!
//! Command-line host for Wavelay: decodes WAV files, runs the core and
//! writes the results.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::engine::{BlendMode, TargetRatePolicy};

/// Wavelay - waveform duration and two-track overlay
#[derive(Parser, Debug)]
#[command(name = "wavelay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the duration of a WAV file in seconds
    #[command(name = "duration")]
    Duration {
        /// Input WAV file
        input: PathBuf,
    },

    /// Overlay two WAV files into one
    #[command(name = "overlay")]
    Overlay {
        /// First input (weighted by --mix-ratio in mix mode)
        audio1: PathBuf,

        /// Second input
        audio2: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Blend mode: add, average or mix
        #[arg(short, long)]
        blend_mode: Option<BlendMode>,

        /// Weight of audio1 in mix mode (0.0 - 1.0)
        #[arg(short, long)]
        mix_ratio: Option<f32>,

        /// Output rate policy: auto, audio1, audio2, higher or lower
        #[arg(short, long)]
        target_rate: Option<TargetRatePolicy>,

        /// JSON overlay config; flags override its fields
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output bit depth: 16, 24 or 32 (float)
        #[arg(long, default_value_t = 24)]
        bit_depth: u16,
    },
}
