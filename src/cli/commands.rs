//! CLI Command Implementations

use std::path::Path;

use log::info;

use crate::engine::{
    duration_secs, export_clip, import_clip, AudioClip, BlendMode, ExportFormat, OverlayConfig,
    OverlayEngine, TargetRatePolicy,
};
use crate::error::Result;

/// Print the duration of a WAV file.
pub fn duration(input: &Path) -> Result<f64> {
    info!("Measuring duration: {}", input.display());

    let clip = import_clip(input)?;
    let seconds = duration_secs(&clip);

    println!("{:.6}", seconds);
    Ok(seconds)
}

/// Build the overlay config from an optional JSON file plus flag overrides.
pub fn resolve_config(
    config_path: Option<&Path>,
    blend_mode: Option<BlendMode>,
    mix_ratio: Option<f32>,
    target_rate: Option<TargetRatePolicy>,
) -> Result<OverlayConfig> {
    let mut config = match config_path {
        Some(path) => {
            info!("Loading overlay config: {}", path.display());
            OverlayConfig::from_json_str(&std::fs::read_to_string(path)?)?
        }
        None => OverlayConfig::default(),
    };

    if let Some(blend_mode) = blend_mode {
        config.blend_mode = blend_mode;
    }
    if let Some(mix_ratio) = mix_ratio {
        config.mix_ratio = mix_ratio;
    }
    if let Some(target_rate) = target_rate {
        config.target_rate_policy = target_rate;
    }

    config.validate()?;
    Ok(config)
}

/// Overlay two WAV files and write the result.
pub fn overlay(
    audio1: &Path,
    audio2: &Path,
    output: &Path,
    config: &OverlayConfig,
    format: ExportFormat,
) -> Result<AudioClip> {
    info!(
        "Overlaying {} + {} ({}, ratio {:.2}, rate policy {})",
        audio1.display(),
        audio2.display(),
        config.blend_mode,
        config.mix_ratio,
        config.target_rate_policy
    );

    let clip1 = import_clip(audio1)?;
    let clip2 = import_clip(audio2)?;

    let mixed = OverlayEngine::new().overlay(&clip1, &clip2, config)?;
    export_clip(&mixed, output, format)?;

    println!(
        "Wrote {} ({} channel(s), {}Hz, {:.3}s)",
        output.display(),
        mixed.waveform.num_channels(),
        mixed.sample_rate,
        mixed.duration_secs()
    );

    Ok(mixed)
}
