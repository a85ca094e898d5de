use crate::config::ModulationMode;

/// One clock of output from the PWM audio hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PwmOutput {
    /// Level of the PWM/PDM output pin
    pub pwm: bool,
    /// Active-low shutdown; false while the output stage is off
    pub shutdown_n: bool,
}

impl PwmOutput {
    /// Pin state as a voltage centered on zero
    ///
    /// +1 or -1 following the pin while the output stage is enabled, 0 while
    /// it is shut down.
    pub fn level(&self) -> i8 {
        match (self.shutdown_n, self.pwm) {
            (false, _) => 0,
            (true, true) => 1,
            (true, false) => -1,
        }
    }
}

/// Clock-stepped producer of one PWM/PDM bit per tick
///
/// Implemented by whatever model of the hardware is being driven.
pub trait PwmSource {
    /// Advance one clock and sample the outputs
    fn tick(&mut self) -> PwmOutput;

    /// Drive the hardware's mode-select input
    fn set_mode(&mut self, mode: ModulationMode);

    /// Frequency of the tone currently being played, when the source knows it
    fn tone_frequency(&self) -> Option<f64> {
        None
    }
}

/// Replays a recorded sequence of hardware outputs
///
/// Once the recording is exhausted the output stage reads as shut down.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    outputs: Vec<PwmOutput>,
    position: usize,
}

impl ReplaySource {
    pub fn new(outputs: Vec<PwmOutput>) -> Self {
        Self {
            outputs,
            position: 0,
        }
    }

    /// Build from raw pin levels with the output stage enabled throughout
    pub fn from_bits<I: IntoIterator<Item = bool>>(bits: I) -> Self {
        Self::new(
            bits.into_iter()
                .map(|pwm| PwmOutput {
                    pwm,
                    shutdown_n: true,
                })
                .collect(),
        )
    }

    pub fn remaining(&self) -> usize {
        self.outputs.len() - self.position
    }
}

impl PwmSource for ReplaySource {
    fn tick(&mut self) -> PwmOutput {
        match self.outputs.get(self.position) {
            Some(&output) => {
                self.position += 1;
                output
            }
            None => PwmOutput::default(),
        }
    }

    fn set_mode(&mut self, mode: ModulationMode) {
        log::debug!("Replay source ignores mode select ({})", mode);
    }
}
