use std::f64::consts::PI;

use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{PdmError, Result};

/// Sine test tone whose frequency sweeps linearly across the run
///
/// Produces one audio-rate sample per call, clipped to [-1, 1] after noise
/// is added.
pub struct ToneSweep {
    sample_rate: f64,
    start_hz: f64,
    stop_hz: f64,
    total_samples: u64,
    amplitude: f64,
    index: u64,
    phase: f64,
    noise: Option<Normal<f64>>,
}

impl ToneSweep {
    /// # Arguments
    /// * `sample_rate` - Rate at which `next_sample` is called, in Hz
    /// * `start_hz` - Frequency of the first sample
    /// * `stop_hz` - Frequency reached after `total_samples` samples
    /// * `total_samples` - Length of the sweep; the tone holds `stop_hz` after
    /// * `amplitude` - Peak amplitude (0-1 range)
    /// * `noise_rms` - Standard deviation of additive Gaussian noise
    pub fn new(
        sample_rate: f64,
        start_hz: f64,
        stop_hz: f64,
        total_samples: u64,
        amplitude: f64,
        noise_rms: f64,
    ) -> Result<Self> {
        let noise = if noise_rms > 0.0 {
            Some(
                Normal::new(0.0, noise_rms)
                    .map_err(|e| PdmError::Config(format!("noise: {:?}", e)))?,
            )
        } else {
            None
        };

        Ok(Self {
            sample_rate,
            start_hz,
            stop_hz,
            total_samples: total_samples.max(1),
            amplitude,
            index: 0,
            phase: 0.0,
            noise,
        })
    }

    /// Instantaneous frequency of the next sample
    pub fn frequency(&self) -> f64 {
        let progress = (self.index as f64 / self.total_samples as f64).min(1.0);
        self.start_hz + (self.stop_hz - self.start_hz) * progress
    }

    pub fn next_sample(&mut self, rng: &mut ChaCha8Rng) -> f64 {
        let mut sample = self.amplitude * self.phase.sin();
        if let Some(ref noise) = self.noise {
            sample += noise.sample(rng);
        }

        self.phase += 2.0 * PI * self.frequency() / self.sample_rate;
        if self.phase >= 2.0 * PI {
            self.phase -= 2.0 * PI;
        }
        self.index += 1;

        sample.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_sweep_endpoints() {
        let mut tone = ToneSweep::new(1000.0, 100.0, 300.0, 10, 0.5, 0.0).unwrap();
        assert_eq!(tone.frequency(), 100.0);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..10 {
            tone.next_sample(&mut rng);
        }
        assert_eq!(tone.frequency(), 300.0);
        tone.next_sample(&mut rng);
        assert_eq!(tone.frequency(), 300.0);
    }

    #[test]
    fn test_constant_tone_amplitude() {
        let mut tone = ToneSweep::new(48000.0, 1000.0, 1000.0, 48000, 0.5, 0.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let samples: Vec<f64> = (0..480).map(|_| tone.next_sample(&mut rng)).collect();

        let peak = samples.iter().cloned().fold(0.0f64, |a, b| a.max(b.abs()));
        assert!((peak - 0.5).abs() < 1e-3, "peak {}", peak);
        assert_eq!(samples[0], 0.0);
    }

    #[test]
    fn test_noise_is_clipped() {
        let mut tone = ToneSweep::new(48000.0, 1000.0, 1000.0, 48000, 1.0, 2.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert!((0..1000).all(|_| tone.next_sample(&mut rng).abs() <= 1.0));
    }
}
