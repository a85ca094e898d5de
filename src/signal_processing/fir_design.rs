use std::io::Write;

use crate::dbl::DoubleWriter;
use crate::error::{PdmError, Result};
use crate::signal_processing::math::{blackman, centered_offset, sinc};

/// Windowed-sinc lowpass tap table
///
/// Designed once from the filter length and normalized cutoff, then owned
/// read-only by the decimator. Taps are stored oldest-to-newest: `taps[0]`
/// weights the oldest sample in the history and `taps[len - 1]` the newest.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCoefficients {
    taps: Vec<f64>,
}

impl FilterCoefficients {
    /// Design an ideal lowpass truncated by a Blackman window
    ///
    /// Tap `i` is `2 fc sinc(2 fc t) * window(i)` with `t = i + 1 - n / 2`.
    /// The result is evenly symmetric about the center tap `c = n / 2 - 1`,
    /// `taps[c - k] == taps[c + k]`; taps beyond `2c` have no mirror.
    ///
    /// # Arguments
    /// * `num_taps` - Filter length; odd lengths are accepted
    /// * `cutoff` - Cutoff in cycles per input sample, in (0, 0.5)
    ///
    /// # Errors
    /// Returns `PdmError::Config` for an empty filter or a cutoff outside
    /// (0, 0.5), and `PdmError::FilterDesign` if any tap is not finite
    pub fn design(num_taps: usize, cutoff: f64) -> Result<Self> {
        if num_taps == 0 {
            return Err(PdmError::Config(
                "filter length must be positive".to_string(),
            ));
        }
        if !(cutoff > 0.0 && cutoff < 0.5) {
            return Err(PdmError::Config(format!(
                "normalized cutoff must be in (0, 0.5), got {}",
                cutoff
            )));
        }

        let taps: Vec<f64> = (0..num_taps)
            .map(|i| {
                let t = centered_offset(i, num_taps);
                2.0 * cutoff * sinc(2.0 * cutoff * t) * blackman(i, num_taps)
            })
            .collect();

        log::debug!(
            "Designed {} taps, fc = {:.3e}, DC gain = {:.6}",
            num_taps,
            cutoff,
            taps.iter().sum::<f64>()
        );

        Self::from_taps(taps)
    }

    /// Wrap an externally supplied tap table
    ///
    /// # Errors
    /// Returns `PdmError::Config` if `taps` is empty and
    /// `PdmError::FilterDesign` if any tap is NaN or infinite
    pub fn from_taps(taps: Vec<f64>) -> Result<Self> {
        if taps.is_empty() {
            return Err(PdmError::Config(
                "filter length must be positive".to_string(),
            ));
        }
        if let Some(i) = taps.iter().position(|t| !t.is_finite()) {
            return Err(PdmError::FilterDesign(format!(
                "tap {} is not finite: {}",
                i, taps[i]
            )));
        }
        Ok(Self { taps })
    }

    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// Sum of all taps: the filter's gain at DC
    pub fn dc_gain(&self) -> f64 {
        self.taps.iter().sum()
    }

    /// Index of the tap at zero offset from the design center
    pub fn center_index(&self) -> usize {
        (self.taps.len() / 2).saturating_sub(1)
    }

    /// Dump the taps as raw host-order doubles
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = DoubleWriter::new(writer);
        out.write_all(&self.taps)?;
        out.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_design_is_deterministic() {
        let a = FilterCoefficients::design(1024, 0.01).unwrap();
        let b = FilterCoefficients::design(1024, 0.01).unwrap();
        assert_eq!(a, b);
        for (x, y) in a.taps().iter().zip(b.taps()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn test_design_symmetric_about_center() {
        for n in [16, 1024, 1025] {
            let coeffs = FilterCoefficients::design(n, 0.01).unwrap();
            let taps = coeffs.taps();
            let c = coeffs.center_index();
            for k in 0..=c {
                assert_abs_diff_eq!(taps[c - k], taps[c + k], epsilon = 1e-15);
            }
        }
    }

    #[test]
    fn test_design_nearly_mirror_symmetric() {
        // Reversing the table shifts the center by one tap, which a narrow
        // cutoff barely notices.
        let coeffs = FilterCoefficients::design(1024, 0.01).unwrap();
        let taps = coeffs.taps();
        let peak = taps.iter().cloned().fold(0.0f64, f64::max);
        for i in 0..taps.len() {
            let diff = (taps[i] - taps[taps.len() - 1 - i]).abs();
            assert!(diff < 0.1 * peak, "tap {}: diff {} vs peak {}", i, diff, peak);
        }
    }

    #[test]
    fn test_dc_gain_near_unity() {
        let coeffs = FilterCoefficients::design(1024, 0.01).unwrap();
        let gain = coeffs.dc_gain();
        assert!((gain - 1.0).abs() < 0.03, "DC gain {}", gain);
    }

    #[test]
    fn test_center_tap_is_twice_cutoff() {
        let fc = 0.01;
        let coeffs = FilterCoefficients::design(1024, fc).unwrap();
        assert_eq!(coeffs.center_index(), 511);
        assert_relative_eq!(coeffs.taps()[511], 2.0 * fc, max_relative = 1e-12);
        let peak = coeffs.taps().iter().cloned().fold(f64::MIN, f64::max);
        assert_eq!(peak, coeffs.taps()[511]);
    }

    #[test]
    fn test_no_singular_taps() {
        for n in [2, 16, 1024, 524288] {
            for fc in [0.001, 0.01, 0.2] {
                let coeffs = FilterCoefficients::design(n, fc).unwrap();
                assert_eq!(coeffs.len(), n);
                assert!(
                    coeffs.taps().iter().all(|t| t.is_finite()),
                    "non-finite tap for n={}, fc={}",
                    n,
                    fc
                );
            }
        }
    }

    #[test]
    fn test_single_tap_design() {
        let coeffs = FilterCoefficients::design(1, 0.1).unwrap();
        assert_eq!(coeffs.len(), 1);
        assert_eq!(coeffs.center_index(), 0);
        assert!(coeffs.taps()[0].is_finite());
    }

    #[test]
    fn test_rejects_invalid_design() {
        assert!(matches!(
            FilterCoefficients::design(0, 0.1),
            Err(PdmError::Config(_))
        ));
        assert!(FilterCoefficients::design(16, 0.0).is_err());
        assert!(FilterCoefficients::design(16, 0.5).is_err());
        assert!(FilterCoefficients::design(16, f64::NAN).is_err());
    }

    #[test]
    fn test_from_taps_rejects_non_finite() {
        assert!(matches!(
            FilterCoefficients::from_taps(vec![0.0, f64::NAN]),
            Err(PdmError::FilterDesign(_))
        ));
        assert!(FilterCoefficients::from_taps(Vec::new()).is_err());
    }

    #[test]
    fn test_write_to_emits_raw_doubles() {
        let coeffs = FilterCoefficients::from_taps(vec![0.25, -1.5, 3.0]).unwrap();
        let mut bytes = Vec::new();
        coeffs.write_to(&mut bytes).unwrap();

        assert_eq!(bytes.len(), 3 * 8);
        assert_eq!(&bytes[8..16], &(-1.5f64).to_ne_bytes());
    }
}
