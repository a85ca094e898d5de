use crate::config::FilterConfig;
use crate::error::Result;
use crate::signal_processing::{FilterCoefficients, HistoryBuffer, RateConverter};
use crate::source::PwmOutput;

/// Lowpass filter and downsampler for a one-bit clock-rate stream
///
/// Every input tick is written into the history; only ticks selected by the
/// rate converter pay for the full convolution. Each output is therefore an
/// instantaneous filter evaluation held to the nearest input tick, which
/// adds a small amount of phase noise compared to a polyphase resampler.
pub struct DecimatingFir {
    coefficients: FilterCoefficients,
    history: HistoryBuffer<i8>,
    rate: RateConverter,
    ticks: u64,
    outputs: u64,
}

impl DecimatingFir {
    /// Create a decimator from a designed tap table
    ///
    /// # Arguments
    /// * `coefficients` - Tap table; its length sets the history length
    /// * `step` - Output rate divided by input rate, in (0, 1]
    ///
    /// # Errors
    /// Returns `PdmError::Config` if `step` is out of range
    pub fn new(coefficients: FilterCoefficients, step: f64) -> Result<Self> {
        let rate = RateConverter::new(step)?;
        Ok(Self {
            history: HistoryBuffer::new(coefficients.len())?,
            coefficients,
            rate,
            ticks: 0,
            outputs: 0,
        })
    }

    /// Validate `config`, design its lowpass and build the decimator
    pub fn from_config(config: &FilterConfig) -> Result<Self> {
        config.validate()?;
        let coefficients =
            FilterCoefficients::design(config.num_taps, config.normalized_cutoff())?;
        log::info!(
            "Lowpass: {} taps, cutoff {} Hz at {} Hz clock, DC gain {:.6}",
            coefficients.len(),
            config.cutoff_hz,
            config.clock_rate_hz,
            coefficients.dc_gain()
        );
        Self::new(coefficients, config.step())
    }

    /// Ingest one signed input sample; returns a filtered output when one is due
    pub fn process(&mut self, sample: i8) -> Option<f64> {
        self.history.push(sample);
        self.ticks += 1;

        if self.rate.tick() {
            self.outputs += 1;
            Some(self.history.convolve(self.coefficients.taps()))
        } else {
            None
        }
    }

    /// Ingest one tick of hardware output
    pub fn process_level(&mut self, output: PwmOutput) -> Option<f64> {
        self.process(output.level())
    }

    /// Run a block of samples, appending any outputs to `out`
    pub fn process_buffer(&mut self, samples: &[i8], out: &mut Vec<f64>) {
        for &sample in samples {
            if let Some(y) = self.process(sample) {
                out.push(y);
            }
        }
    }

    pub fn coefficients(&self) -> &FilterCoefficients {
        &self.coefficients
    }

    /// Input ticks consumed so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Output samples produced so far
    pub fn outputs(&self) -> u64 {
        self.outputs
    }

    /// Group delay of the design in input ticks
    pub fn group_delay_ticks(&self) -> usize {
        self.coefficients.len() - 1 - self.coefficients.center_index()
    }

    /// Clear the history and rate phase, keeping the taps
    pub fn reset(&mut self) {
        self.history.reset();
        self.rate.reset();
        self.ticks = 0;
        self.outputs = 0;
    }
}
