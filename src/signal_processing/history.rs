use crate::error::{PdmError, Result};

/// Circular history of the most recent `len` input samples
///
/// `pos` is the slot the next sample overwrites, which is also the oldest
/// sample held. The buffer starts zero-filled, so until `len` samples have
/// been pushed the oldest entries read as silence.
#[derive(Debug, Clone)]
pub struct HistoryBuffer<T> {
    samples: Vec<T>,
    pos: usize,
}

impl<T> HistoryBuffer<T>
where
    T: Copy + Default + Into<f64>,
{
    /// # Errors
    /// Returns `PdmError::Config` if `len` is zero
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(PdmError::Config(
                "history length must be positive".to_string(),
            ));
        }
        Ok(Self {
            samples: vec![T::default(); len],
            pos: 0,
        })
    }

    /// Overwrite the oldest sample and advance the cursor
    pub fn push(&mut self, sample: T) {
        self.samples[self.pos] = sample;
        self.pos += 1;
        if self.pos == self.samples.len() {
            self.pos = 0;
        }
    }

    /// Slot that receives the next sample
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample pushed `age` pushes ago (0 is the most recent)
    pub fn get(&self, age: usize) -> Option<T> {
        let n = self.samples.len();
        if age >= n {
            return None;
        }
        Some(self.samples[(self.pos + n - 1 - age) % n])
    }

    /// Inner product of `taps` with the history, oldest sample first
    ///
    /// Computes `sum(taps[i] * history[(pos + i) % len])`. The ring is walked
    /// as two contiguous ranges, `[pos, len)` then `[0, pos)`, so the inner
    /// loops carry no modulo.
    ///
    /// # Panics
    /// Panics if `taps.len()` differs from the history length
    pub fn convolve(&self, taps: &[f64]) -> f64 {
        let n = self.samples.len();
        assert_eq!(taps.len(), n, "tap count must match history length");

        let (newer, older) = self.samples.split_at(self.pos);
        let (older_taps, newer_taps) = taps.split_at(n - self.pos);

        let mut acc = 0.0f64;
        for (&tap, &sample) in older_taps.iter().zip(older) {
            let x: f64 = sample.into();
            acc += tap * x;
        }
        for (&tap, &sample) in newer_taps.iter().zip(newer) {
            let x: f64 = sample.into();
            acc += tap * x;
        }
        acc
    }

    /// Zero the history and rewind the cursor
    pub fn reset(&mut self) {
        self.samples.fill(T::default());
        self.pos = 0;
    }
}
