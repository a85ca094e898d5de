//! Clock-by-clock driving loop: hardware model in, filtered samples out.

use std::io::Write;

use rolling_stats::Stats;
use serde::Serialize;

use crate::dbl::DoubleWriter;
use crate::error::Result;
use crate::signal_processing::DecimatingFir;
use crate::source::PwmSource;

/// Length of a run and how often to report on it
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Clocks to simulate
    pub total_ticks: u64,
    /// Clocks between progress reports
    pub progress_interval: u64,
    /// Clock rate used to convert ticks to simulated seconds
    pub clock_rate_hz: f64,
}

/// Summary statistics of a sequence of samples
#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl StatsSummary {
    pub fn from_stats(stats: &Stats<f64>) -> Option<Self> {
        if stats.count == 0 {
            return None;
        }
        Some(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
        })
    }

    /// Summarize a slice in one pass
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let mut stats: Stats<f64> = Stats::new();
        for &sample in samples {
            stats.update(sample);
        }
        Self::from_stats(&stats)
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Clocks simulated
    pub ticks: u64,
    /// Output samples written
    pub samples: u64,
    /// Simulated duration in seconds
    pub simulated_secs: f64,
    /// Statistics of the written samples
    pub output: Option<StatsSummary>,
}

/// Drive `source` for `options.total_ticks` clocks
///
/// Each clock the source is stepped once and its output fed to `fir`; every
/// sample the decimator emits is appended to `sink` in tick order.
///
/// # Errors
/// Returns `PdmError::Io` if the sink fails; the samples written before the
/// failure remain in the sink.
pub fn run<S, W>(
    source: &mut S,
    fir: &mut DecimatingFir,
    sink: &mut DoubleWriter<W>,
    options: &RunOptions,
) -> Result<RunSummary>
where
    S: PwmSource + ?Sized,
    W: Write,
{
    let mut stats: Stats<f64> = Stats::new();
    let progress_interval = options.progress_interval.max(1);

    for k in 0..options.total_ticks {
        if k % progress_interval == 0 {
            report_progress(k, options.clock_rate_hz, source.tone_frequency());
        }

        let output = source.tick();
        if let Some(sample) = fir.process_level(output) {
            sink.write_sample(sample)?;
            stats.update(sample);
        }
    }

    let summary = RunSummary {
        ticks: options.total_ticks,
        samples: stats.count as u64,
        simulated_secs: options.total_ticks as f64 / options.clock_rate_hz,
        output: StatsSummary::from_stats(&stats),
    };
    log::info!(
        "Simulated {} clocks ({:.3} s), wrote {} samples",
        summary.ticks,
        summary.simulated_secs,
        summary.samples
    );
    Ok(summary)
}

fn report_progress(tick: u64, clock_rate_hz: f64, tone_hz: Option<f64>) {
    let secs = tick as f64 / clock_rate_hz;
    match tone_hz {
        Some(f) => log::info!("k = {:>10} clocks, {:>5.2} secs, f = {:>8.1} Hz", tick, secs, f),
        None => log::info!("k = {:>10} clocks, {:>5.2} secs", tick, secs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal_processing::FilterCoefficients;
    use crate::source::ReplaySource;

    #[test]
    fn test_run_writes_one_sample_per_output_tick() {
        let taps = FilterCoefficients::from_taps(vec![0.5, 0.5]).unwrap();
        let mut fir = DecimatingFir::new(taps, 0.5).unwrap();
        let mut source = ReplaySource::from_bits([true, true, false, false, true, false]);
        let mut sink = DoubleWriter::new(Vec::new());

        let options = RunOptions {
            total_ticks: 6,
            progress_interval: 2,
            clock_rate_hz: 1000.0,
        };
        let summary = run(&mut source, &mut fir, &mut sink, &options).unwrap();

        assert_eq!(summary.ticks, 6);
        assert_eq!(summary.samples, 3);
        assert!((summary.simulated_secs - 0.006).abs() < 1e-12);

        let bytes = sink.finish().unwrap();
        let written: Vec<f64> = bytes
            .chunks_exact(8)
            .map(|c| f64::from_ne_bytes(c.try_into().unwrap()))
            .collect();
        assert_eq!(written, vec![1.0, -1.0, 0.0]);

        let stats = summary.output.unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, -1.0);
        assert_eq!(stats.max, 1.0);
    }

    #[test]
    fn test_exhausted_replay_reads_as_silence() {
        let taps = FilterCoefficients::from_taps(vec![1.0]).unwrap();
        let mut fir = DecimatingFir::new(taps, 1.0).unwrap();
        let mut source = ReplaySource::from_bits([true]);
        let mut sink = DoubleWriter::new(Vec::new());

        let options = RunOptions {
            total_ticks: 3,
            progress_interval: 1000,
            clock_rate_hz: 1000.0,
        };
        run(&mut source, &mut fir, &mut sink, &options).unwrap();

        let bytes = sink.finish().unwrap();
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[8..], &[0u8; 16]);
    }

    #[test]
    fn test_summary_counts_only_this_run() {
        let taps = FilterCoefficients::from_taps(vec![1.0]).unwrap();
        let mut fir = DecimatingFir::new(taps, 0.5).unwrap();
        let mut source = ReplaySource::from_bits([true; 8]);
        let mut sink = DoubleWriter::new(Vec::new());

        let options = RunOptions {
            total_ticks: 4,
            progress_interval: 1000,
            clock_rate_hz: 1000.0,
        };
        let first = run(&mut source, &mut fir, &mut sink, &options).unwrap();
        let second = run(&mut source, &mut fir, &mut sink, &options).unwrap();

        assert_eq!(first.samples, 2);
        assert_eq!(second.samples, 2);
        assert_eq!(second.output.unwrap().count, 2);
        assert_eq!(sink.count(), 4);
    }

    #[test]
    fn test_stats_summary_of_empty_slice() {
        assert!(StatsSummary::from_samples(&[]).is_none());
        let stats = StatsSummary::from_samples(&[1.0, 3.0]).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 2.0);
    }
}
