// Plays a sine tone through the default audio output for a fixed time

mod tone;

use clap::Parser;
use halout_core::{AudioBufferList, SampleFormat, VolumeCurve};
use halout_renderer_api::{AudioRenderer, OutputConfig, RenderCallback, RenderInfo};
use halout_renderer_cpal::CpalOutputUnit;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;
use tone::{Tone, DEFAULT_AMPLITUDE, DEFAULT_FREQUENCY};

#[derive(Parser, Debug)]
#[command(name = "halout-tone")]
#[command(about = "Play a sine tone through the default audio output", long_about = None)]
struct Cli {
    /// Sample format handed to the output (s16le, s16be, s32le, s32be, float)
    #[arg(short, long, default_value = "float")]
    format: SampleFormat,

    /// Sample rate in Hz
    #[arg(short, long, default_value_t = 44100)]
    rate: u32,

    /// Channel count
    #[arg(short, long, default_value_t = 1)]
    channels: u16,

    /// Tone frequency in Hz
    #[arg(long, default_value_t = DEFAULT_FREQUENCY)]
    frequency: f64,

    #[arg(long, default_value_t = DEFAULT_AMPLITUDE)]
    amplitude: f64,

    /// Output volume, 0..=100
    #[arg(short, long, default_value_t = 100, value_parser = clap::value_parser!(u8).range(0..=100))]
    volume: u8,

    /// How long to play, in milliseconds
    #[arg(short, long, default_value_t = 1000, env = "HALOUT_DURATION_MS")]
    duration_ms: u64,

    /// Use a linear volume taper instead of the decibel curve
    #[arg(long)]
    linear_volume: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::debug!("{:?}", cli);

    let mut unit = match CpalOutputUnit::open_default() {
        Ok(unit) => unit,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(name) = unit.device_name() {
        log::debug!("Default output: {}", name);
    }

    let curve = if cli.linear_volume {
        VolumeCurve::Linear
    } else {
        VolumeCurve::default()
    };
    let config = OutputConfig::new(cli.format, cli.rate, cli.channels).with_volume_curve(curve);

    let mut tone = Tone::new(cli.frequency, cli.rate).with_amplitude(cli.amplitude);
    let callback: RenderCallback =
        Box::new(move |info: &RenderInfo, list: &mut AudioBufferList| tone.render(info, list));

    if let Err(e) = unit.open(config, callback) {
        log::error!("{}", e);
        if let Err(e) = unit.release() {
            log::warn!("{}", e);
        }
        eprintln!("failed to open");
        return ExitCode::FAILURE;
    }

    if let Err(e) = unit.set_volume(cli.volume) {
        log::warn!("{}", e);
    }

    // Rendering happens on the device thread
    thread::sleep(Duration::from_millis(cli.duration_ms));

    let result = unit.close().and_then(|_| unit.release());
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["halout-tone"]).unwrap();
        assert_eq!(cli.format, SampleFormat::Float);
        assert_eq!(cli.rate, 44100);
        assert_eq!(cli.channels, 1);
        assert_eq!(cli.volume, 100);
        assert!(!cli.linear_volume);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "halout-tone",
            "--format",
            "s16be",
            "--rate",
            "48000",
            "--channels",
            "2",
            "--volume",
            "50",
            "--linear-volume",
        ])
        .unwrap();
        assert_eq!(cli.format, SampleFormat::S16Be);
        assert_eq!(cli.rate, 48000);
        assert_eq!(cli.channels, 2);
        assert_eq!(cli.volume, 50);
        assert!(cli.linear_volume);
    }

    #[test]
    fn test_cli_rejects_bad_values() {
        assert!(Cli::try_parse_from(["halout-tone", "--format", "u8"]).is_err());
        assert!(Cli::try_parse_from(["halout-tone", "--volume", "101"]).is_err());
    }
}
