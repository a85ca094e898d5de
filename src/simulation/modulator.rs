use rand::RngExt;
use rand_chacha::ChaCha8Rng;

use crate::config::ModulationMode;

/// One-bit modulator running at the clock rate
///
/// PWM and PDM compare a `bits`-wide counter against the sample scaled to
/// `0..=2^bits`. PWM uses the counter directly, giving one pulse per
/// counter period; PDM bit-reverses it first, spreading the same duty cycle
/// evenly across the period. Sigma-delta feeds the quantization error back
/// into an integrator.
pub struct Modulator {
    mode: ModulationMode,
    bits: u32,
    counter: u32,
    integrator: f64,
    dither: bool,
}

impl Modulator {
    pub fn new(mode: ModulationMode, bits: u32, dither: bool) -> Self {
        Self {
            mode,
            bits,
            counter: 0,
            integrator: 0.0,
            dither,
        }
    }

    pub fn mode(&self) -> ModulationMode {
        self.mode
    }

    /// Switch scheme; counter and integrator restart from zero
    pub fn set_mode(&mut self, mode: ModulationMode) {
        self.mode = mode;
        self.counter = 0;
        self.integrator = 0.0;
    }

    /// Emit the output bit for one clock given the current audio sample in [-1, 1]
    pub fn modulate(&mut self, sample: f64, rng: &mut ChaCha8Rng) -> bool {
        match self.mode {
            ModulationMode::Pwm => {
                let bit = self.counter < self.threshold(sample);
                self.advance_counter();
                bit
            }
            ModulationMode::Pdm => {
                let reversed = self.counter.reverse_bits() >> (32 - self.bits);
                let bit = reversed < self.threshold(sample);
                self.advance_counter();
                bit
            }
            ModulationMode::SigmaDelta => {
                let mut target = sample;
                if self.dither {
                    let lsb = 2.0 / (1u64 << self.bits) as f64;
                    target += (rng.random::<f64>() - rng.random::<f64>()) * lsb;
                }
                let v = self.integrator + target;
                let bit = v >= 0.0;
                self.integrator = v - if bit { 1.0 } else { -1.0 };
                bit
            }
        }
    }

    fn threshold(&self, sample: f64) -> u32 {
        let full_scale = (1u64 << self.bits) as f64;
        ((sample.clamp(-1.0, 1.0) + 1.0) * 0.5 * full_scale).round() as u32
    }

    fn advance_counter(&mut self) {
        self.counter = (self.counter + 1) & ((1u32 << self.bits) - 1);
    }
}
