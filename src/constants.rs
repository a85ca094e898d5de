//! Numeric constants for filter design and the reference demo setup.

/// Below this normalized argument `sinc` is evaluated from its Taylor series
/// instead of `sin(x)/x`. The series is truncated after the x^12 term; at the
/// threshold the two branches agree to within 1e-12.
pub const SINC_SERIES_THRESHOLD: f64 = 0.3;

/// Input clock rate of the reference design (one PWM/PDM bit per clock).
pub const DEFAULT_CLOCK_RATE_HZ: f64 = 100_000_000.0;

/// Output audio sample rate of the reference design.
pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 44_100.0;

/// Lowpass cutoff of the reference design.
pub const DEFAULT_CUTOFF_HZ: f64 = 22_000.0;

/// Filter length of the reference design.
pub const DEFAULT_NUM_TAPS: usize = 65536 * 8;

/// Width in bytes of one value in a raw `.dbl` stream.
pub const DOUBLE_BYTES: usize = std::mem::size_of::<f64>();
