use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use pdmdemo::config::{DemoConfig, Frequency, ModulationMode};
use pdmdemo::dbl::{DoubleWriter, read_doubles};
use pdmdemo::demo::{RunOptions, RunSummary, run};
use pdmdemo::simulation::SimulatedPwmAudio;
use pdmdemo::{DecimatingFir, FilterCoefficients, PwmSource, save_wav};

#[derive(Parser, Debug)]
#[command(name = "pdmdemo")]
#[command(
    about = "Simulate a one-bit PWM/PDM audio output and decimate it to audio rate",
    long_about = None
)]
struct Args {
    /// TOML configuration file; command-line options override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Modulation scheme: pwm, pdm, sigma-delta
    #[arg(short, long, value_enum)]
    mode: Option<ModulationMode>,

    /// Simulated duration in seconds
    #[arg(short, long)]
    duration: Option<f64>,

    /// Input clock rate (e.g., "100MHz")
    #[arg(long)]
    clock_rate: Option<Frequency>,

    /// Output sample rate (e.g., "44.1kHz")
    #[arg(long)]
    sample_rate: Option<Frequency>,

    /// Lowpass cutoff (e.g., "22kHz")
    #[arg(long)]
    cutoff: Option<Frequency>,

    /// Number of filter taps
    #[arg(long)]
    taps: Option<usize>,

    /// Test tone frequency at the start of the sweep
    #[arg(long)]
    tone_start: Option<Frequency>,

    /// Test tone frequency at the end of the sweep
    #[arg(long)]
    tone_stop: Option<Frequency>,

    /// Test tone peak amplitude (0-1)
    #[arg(long)]
    amplitude: Option<f64>,

    /// Seed for noise and dither
    #[arg(long)]
    seed: Option<u64>,

    /// Output sample stream (raw doubles)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Where to dump the filter taps (raw doubles)
    #[arg(long, conflicts_with = "no_taps_file")]
    taps_file: Option<PathBuf>,

    /// Skip dumping the filter taps
    #[arg(long)]
    no_taps_file: bool,

    /// Also write the output samples as a float WAV file
    #[arg(long)]
    wav: Option<PathBuf>,

    /// Summary format: text, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = build_config(&args)?;
    config.validate().context("invalid configuration")?;

    let filter = &config.filter;
    println!("=== PDM/PWM audio decimation demo ===");
    println!("Clock rate: {}", Frequency::from_hz(filter.clock_rate_hz));
    println!("Sample rate: {}", Frequency::from_hz(filter.sample_rate_hz));
    println!(
        "Lowpass: {} taps, cutoff {}",
        filter.num_taps,
        Frequency::from_hz(filter.cutoff_hz)
    );
    println!("Creating the output for the {} modulator", config.simulation.mode);
    println!();

    let mut fir = DecimatingFir::from_config(filter).context("failed to build decimator")?;

    if let Some(ref path) = config.output.taps_path {
        // The tap dump is diagnostic only; the run goes ahead without it.
        if let Err(e) = dump_taps(fir.coefficients(), path) {
            log::warn!("Could not write filter taps to {}: {:#}", path.display(), e);
        }
    }

    let mut hardware = SimulatedPwmAudio::new(filter, &config.simulation)?;
    hardware.set_mode(config.simulation.mode);

    let samples_path = &config.output.samples_path;
    let mut sink = DoubleWriter::create(samples_path)
        .with_context(|| format!("failed to create {}", samples_path.display()))?;

    let options = RunOptions {
        total_ticks: config.simulation.total_ticks(filter.clock_rate_hz),
        progress_interval: config.output.progress_interval(filter.clock_rate_hz),
        clock_rate_hz: filter.clock_rate_hz,
    };
    let summary = run(&mut hardware, &mut fir, &mut sink, &options)
        .with_context(|| format!("failed writing {}", samples_path.display()))?;
    sink.finish()?;

    if let Some(ref wav_path) = config.output.wav_path {
        let samples = read_doubles(samples_path)?;
        save_wav(wav_path, &samples, filter.sample_rate_hz.round() as u32)
            .with_context(|| format!("failed to write {}", wav_path.display()))?;
        log::info!("Wrote {} samples to {}", samples.len(), wav_path.display());
    }

    match args.format {
        OutputFormat::Text => print_text(&summary, samples_path),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}

fn build_config(args: &Args) -> anyhow::Result<DemoConfig> {
    let mut config = match args.config {
        Some(ref path) => DemoConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => DemoConfig::default(),
    };

    if let Some(mode) = args.mode {
        config.simulation.mode = mode;
    }
    if let Some(duration) = args.duration {
        config.simulation.duration_secs = duration;
    }
    if let Some(rate) = args.clock_rate {
        config.filter.clock_rate_hz = rate.as_hz();
    }
    if let Some(rate) = args.sample_rate {
        config.filter.sample_rate_hz = rate.as_hz();
    }
    if let Some(cutoff) = args.cutoff {
        config.filter.cutoff_hz = cutoff.as_hz();
    }
    if let Some(taps) = args.taps {
        config.filter.num_taps = taps;
    }
    if let Some(f) = args.tone_start {
        config.simulation.tone_start_hz = f.as_hz();
    }
    if let Some(f) = args.tone_stop {
        config.simulation.tone_stop_hz = f.as_hz();
    }
    if let Some(amplitude) = args.amplitude {
        config.simulation.amplitude = amplitude;
    }
    if args.seed.is_some() {
        config.simulation.seed = args.seed;
    }
    if let Some(ref output) = args.output {
        config.output.samples_path = output.clone();
    }
    if args.no_taps_file {
        config.output.taps_path = None;
    } else if let Some(ref path) = args.taps_file {
        config.output.taps_path = Some(path.clone());
    }
    if let Some(ref wav) = args.wav {
        config.output.wav_path = Some(wav.clone());
    }

    Ok(config)
}

fn dump_taps(coefficients: &FilterCoefficients, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)?;
    coefficients.write_to(BufWriter::new(file))?;
    log::info!("Wrote {} taps to {}", coefficients.len(), path.display());
    Ok(())
}

fn print_text(summary: &RunSummary, samples_path: &Path) {
    println!(
        "Simulated {} clocks ({:.3} s)",
        summary.ticks, summary.simulated_secs
    );
    println!(
        "Wrote {} samples to {}",
        summary.samples,
        samples_path.display()
    );
    if let Some(ref stats) = summary.output {
        println!(
            "Output: mean {:+.6}, std {:.6}, min {:+.6}, max {:+.6}",
            stats.mean, stats.std_dev, stats.min, stats.max
        );
    }
}
