//! Wavelay CLI
//!
//! Command-line host for waveform duration and overlay mixing.

use clap::Parser;
use env_logger::Env;
use log::{debug, error};

use wavelay::cli::{commands, Cli, Commands};
use wavelay::engine::ExportFormat;
use wavelay::Result;

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    debug!("Wavelay v{}", env!("CARGO_PKG_VERSION"));

    if let Err(err) = handle_command(cli.command) {
        error!("{} [{}]", err, err.error_code());
        for suggestion in err.recovery_suggestions() {
            eprintln!("  - {}", suggestion);
        }
        std::process::exit(1);
    }
}

fn handle_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Duration { input } => commands::duration(&input).map(|_| ()),
        Commands::Overlay {
            audio1,
            audio2,
            output,
            blend_mode,
            mix_ratio,
            target_rate,
            config,
            bit_depth,
        } => {
            let config =
                commands::resolve_config(config.as_deref(), blend_mode, mix_ratio, target_rate)?;
            commands::overlay(
                &audio1,
                &audio2,
                &output,
                &config,
                ExportFormat::new(bit_depth),
            )
            .map(|_| ())
        }
    }
}
