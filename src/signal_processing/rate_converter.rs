use crate::error::{PdmError, Result};

/// Fractional-rate output scheduler
///
/// Accumulates `step = output_rate / input_rate` once per input tick and
/// fires whenever the phase reaches one, subtracting one rather than
/// resetting so that the long-run output count tracks `ticks * step`
/// without drift. Outputs land on the nearest following input tick; there
/// is no sub-tick interpolation.
#[derive(Debug, Clone)]
pub struct RateConverter {
    subsample: f64,
    step: f64,
}

impl RateConverter {
    /// # Errors
    /// Returns `PdmError::Config` unless `0 < step <= 1`
    pub fn new(step: f64) -> Result<Self> {
        if !(step > 0.0 && step <= 1.0) {
            return Err(PdmError::Config(format!(
                "rate step must be in (0, 1], got {}",
                step
            )));
        }
        Ok(Self {
            subsample: 0.0,
            step,
        })
    }

    /// Advance one input tick; true when an output is due on this tick
    pub fn tick(&mut self) -> bool {
        self.subsample += self.step;
        if self.subsample >= 1.0 {
            self.subsample -= 1.0;
            true
        } else {
            false
        }
    }

    /// Current phase, always in [0, 1) between ticks
    pub fn subsample(&self) -> f64 {
        self.subsample
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn reset(&mut self) {
        self.subsample = 0.0;
    }
}
