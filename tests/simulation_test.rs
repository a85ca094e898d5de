use pdmdemo::config::{FilterConfig, ModulationMode, SimulationConfig};
use pdmdemo::dbl::{DoubleWriter, read_doubles};
use pdmdemo::demo::{RunOptions, run};
use pdmdemo::simulation::SimulatedPwmAudio;
use pdmdemo::{DecimatingFir, PwmSource};
use tempfile::TempDir;

fn filter_config() -> FilterConfig {
    FilterConfig {
        clock_rate_hz: 1_024_000.0,
        sample_rate_hz: 8_000.0,
        cutoff_hz: 3_500.0,
        num_taps: 4096,
    }
}

fn sim_config(mode: ModulationMode) -> SimulationConfig {
    SimulationConfig {
        mode,
        duration_secs: 0.05,
        tone_start_hz: 500.0,
        tone_stop_hz: 500.0,
        amplitude: 0.5,
        counter_bits: 7,
        startup_ticks: 0,
        noise_rms: 0.0,
        dither: false,
        seed: Some(42),
    }
}

fn options_for(filter: &FilterConfig, sim: &SimulationConfig) -> RunOptions {
    RunOptions {
        total_ticks: sim.total_ticks(filter.clock_rate_hz),
        progress_interval: 1024,
        clock_rate_hz: filter.clock_rate_hz,
    }
}

fn decode(bytes: &[u8]) -> Vec<f64> {
    bytes
        .chunks_exact(8)
        .map(|c| f64::from_ne_bytes(c.try_into().unwrap()))
        .collect()
}

fn simulate(mode: ModulationMode) -> Vec<f64> {
    let filter = filter_config();
    let sim = sim_config(mode);

    let mut hardware = SimulatedPwmAudio::new(&filter, &sim).unwrap();
    hardware.set_mode(mode);
    let mut fir = DecimatingFir::from_config(&filter).unwrap();
    let mut sink = DoubleWriter::new(Vec::new());

    let summary = run(&mut hardware, &mut fir, &mut sink, &options_for(&filter, &sim)).unwrap();
    assert_eq!(summary.samples, 400);

    decode(&sink.finish().unwrap())
}

fn rms(samples: &[f64]) -> f64 {
    (samples.iter().map(|x| x * x).sum::<f64>() / samples.len() as f64).sqrt()
}

#[test]
fn test_every_mode_recovers_the_tone() {
    let expected_rms = 0.5 / 2.0f64.sqrt();

    for mode in [
        ModulationMode::Pwm,
        ModulationMode::Pdm,
        ModulationMode::SigmaDelta,
    ] {
        let output = simulate(mode);
        // Skip the filter's fill-up; 368 samples is exactly 23 tone periods.
        let settled = &output[32..];
        let got = rms(settled);
        assert!(
            (got - expected_rms).abs() < 0.05 * expected_rms,
            "{}: RMS {} expected {}",
            mode,
            got,
            expected_rms
        );
        assert!(settled.iter().all(|y| y.abs() < 0.6), "{}: overshoot", mode);
    }
}

#[test]
fn test_startup_shutdown_gives_silent_prefix() {
    let filter = FilterConfig {
        num_taps: 256,
        ..filter_config()
    };
    let sim = SimulationConfig {
        startup_ticks: 10_240,
        duration_secs: 0.02,
        ..sim_config(ModulationMode::Pdm)
    };

    let mut hardware = SimulatedPwmAudio::new(&filter, &sim).unwrap();
    let mut fir = DecimatingFir::from_config(&filter).unwrap();
    let mut sink = DoubleWriter::new(Vec::new());
    run(&mut hardware, &mut fir, &mut sink, &options_for(&filter, &sim)).unwrap();

    let output = decode(&sink.finish().unwrap());
    assert_eq!(output.len(), 160);
    // 10240 shutdown clocks cover the first 80 outputs.
    assert!(output[..80].iter().all(|&y| y == 0.0));
    assert!(output[81..].iter().any(|&y| y != 0.0));
}

#[test]
fn test_run_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wavfp.dbl");

    let filter = FilterConfig {
        num_taps: 512,
        ..filter_config()
    };
    let sim = SimulationConfig {
        duration_secs: 0.01,
        ..sim_config(ModulationMode::SigmaDelta)
    };

    let mut hardware = SimulatedPwmAudio::new(&filter, &sim).unwrap();
    let mut fir = DecimatingFir::from_config(&filter).unwrap();
    let mut sink = DoubleWriter::create(&path).unwrap();
    let summary = run(&mut hardware, &mut fir, &mut sink, &options_for(&filter, &sim)).unwrap();
    sink.finish().unwrap();

    let samples = read_doubles(&path).unwrap();
    assert_eq!(samples.len() as u64, summary.samples);
    assert_eq!(samples.len(), 80);
    assert!(samples.iter().all(|y| y.is_finite()));
}
