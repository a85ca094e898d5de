//! Software stand-in for the PWM audio hardware.
//!
//! Plays a swept test tone through a one-bit modulator at the clock rate,
//! exposing the same per-clock outputs (pin level and active-low shutdown)
//! as the real design.

mod modulator;
mod tone;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{FilterConfig, ModulationMode, SimulationConfig};
use crate::error::Result;
use crate::source::{PwmOutput, PwmSource};

pub use modulator::Modulator;
pub use tone::ToneSweep;

/// Clock-stepped model of the PWM audio controller
///
/// A new audio sample is fetched every `clock_rate / sample_rate` clocks and
/// held while the modulator runs once per clock. The output stage reports
/// shutdown for the first `startup_ticks` clocks.
pub struct SimulatedPwmAudio {
    tone: ToneSweep,
    modulator: Modulator,
    rng: ChaCha8Rng,
    clocks_per_sample: u64,
    hold: u64,
    current: f64,
    startup_ticks: u64,
    tick: u64,
}

impl SimulatedPwmAudio {
    pub fn new(filter: &FilterConfig, sim: &SimulationConfig) -> Result<Self> {
        sim.validate()?;

        let clocks_per_sample = (filter.clock_rate_hz / filter.sample_rate_hz)
            .round()
            .max(1.0) as u64;
        let audio_rate = filter.clock_rate_hz / clocks_per_sample as f64;
        let total_samples = (sim.duration_secs * audio_rate).round() as u64;

        let tone = ToneSweep::new(
            audio_rate,
            sim.tone_start_hz,
            sim.tone_stop_hz,
            total_samples,
            sim.amplitude,
            sim.noise_rms,
        )?;

        let rng = match sim.seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => rand::make_rng(),
        };

        log::debug!(
            "Simulated hardware: {}, {} clocks per audio sample, {}-bit counter",
            sim.mode,
            clocks_per_sample,
            sim.counter_bits
        );

        Ok(Self {
            tone,
            modulator: Modulator::new(sim.mode, sim.counter_bits, sim.dither),
            rng,
            clocks_per_sample,
            hold: 0,
            current: 0.0,
            startup_ticks: sim.startup_ticks,
            tick: 0,
        })
    }

    pub fn mode(&self) -> ModulationMode {
        self.modulator.mode()
    }

    fn is_enabled(&self) -> bool {
        self.tick >= self.startup_ticks
    }
}

impl PwmSource for SimulatedPwmAudio {
    fn tick(&mut self) -> PwmOutput {
        let enabled = self.is_enabled();
        self.tick += 1;
        if !enabled {
            return PwmOutput::default();
        }

        if self.hold == 0 {
            self.current = self.tone.next_sample(&mut self.rng);
            self.hold = self.clocks_per_sample;
        }
        self.hold -= 1;

        PwmOutput {
            pwm: self.modulator.modulate(self.current, &mut self.rng),
            shutdown_n: true,
        }
    }

    fn set_mode(&mut self, mode: ModulationMode) {
        log::info!("Mode select: {}", mode);
        self.modulator.set_mode(mode);
    }

    fn tone_frequency(&self) -> Option<f64> {
        self.is_enabled().then(|| self.tone.frequency())
    }
}
