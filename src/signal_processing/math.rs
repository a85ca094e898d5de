use std::f64::consts::PI;

use crate::constants::SINC_SERIES_THRESHOLD;

/// Normalized sinc, `sin(pi f) / (pi f)`
///
/// Near zero the closed form loses precision and is undefined at the origin,
/// so arguments below `SINC_SERIES_THRESHOLD` use the Taylor expansion
///
/// `1 - x^2/3! + x^4/5! - ... - x^12/13!`
///
/// in nested form. `sinc(0.0)` is exactly 1.
pub fn sinc(f: f64) -> f64 {
    let x = PI * f;
    if f.abs() < SINC_SERIES_THRESHOLD {
        let xsq = x * x;
        1.0 - (xsq / 6.0)
            * (1.0
                - (xsq / 20.0)
                    * (1.0
                        - (xsq / 42.0)
                            * (1.0
                                - (xsq / 72.0)
                                    * (1.0 - (xsq / 110.0) * (1.0 - xsq / 156.0)))))
    } else {
        x.sin() / x
    }
}

/// Three-term Blackman window evaluated at tap `i` of an `n`-tap filter
///
/// The window is centered on the same tap as the lowpass design
/// (`i + 1 == n / 2`) and spans `n + 1` positions, so it never reaches zero
/// inside the filter.
pub fn blackman(i: usize, n: usize) -> f64 {
    let u = centered_offset(i, n) / (n as f64 + 1.0);
    0.42 + 0.50 * (2.0 * PI * u).cos() + 0.08 * (4.0 * PI * u).cos()
}

/// Offset of tap `i` from the design center, `i + 1 - n / 2`
///
/// `n / 2` is integer division, so for odd `n` the center sits on tap
/// `(n - 1) / 2 - 1`.
pub fn centered_offset(i: usize, n: usize) -> f64 {
    (i + 1) as f64 - (n / 2) as f64
}
