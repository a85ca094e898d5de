//! Configuration for the PDM/PWM decimation demo.
//!
//! Every field has a default matching the reference setup (a 100 MHz clock
//! decimated to 44.1 kHz through a 524288-tap lowpass). A TOML file may
//! override any subset of them:
//!
//! ```toml
//! [filter]
//! num_taps = 4096
//!
//! [simulation]
//! mode = "sigma-delta"
//! duration_secs = 0.01
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::constants::{
    DEFAULT_CLOCK_RATE_HZ, DEFAULT_CUTOFF_HZ, DEFAULT_NUM_TAPS, DEFAULT_SAMPLE_RATE_HZ,
};
use crate::error::{PdmError, Result};

/// Frequency parsed from text
///
/// # Parsing formats
/// - `44100` - frequency in Hz (no suffix)
/// - `44100hz` or `44100Hz` - frequency in Hz (explicit)
/// - `44.1khz` or `44.1kHz` - kilohertz
/// - `100mhz` or `100MHz` - megahertz
///
/// # Example
/// ```
/// use pdmdemo::config::Frequency;
///
/// let clock: Frequency = "100MHz".parse().unwrap();
/// assert_eq!(clock.as_hz(), 100_000_000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frequency(f64);

impl Frequency {
    pub fn from_hz(hz: f64) -> Self {
        Self(hz)
    }

    pub fn as_hz(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 1e6 {
            write!(f, "{}MHz", self.0 / 1e6)
        } else if self.0 >= 1e3 {
            write!(f, "{}kHz", self.0 / 1e3)
        } else {
            write!(f, "{}Hz", self.0)
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();

        let (num, scale) = if let Some(num) = lower.strip_suffix("mhz") {
            (num, 1e6)
        } else if let Some(num) = lower.strip_suffix("khz") {
            (num, 1e3)
        } else if let Some(num) = lower.strip_suffix("hz") {
            (num, 1.0)
        } else {
            (lower.as_str(), 1.0)
        };

        let value: f64 = num
            .trim()
            .parse()
            .map_err(|_| format!("invalid frequency: {}", s))?;
        if !value.is_finite() || value <= 0.0 {
            return Err("frequency must be positive".to_string());
        }
        Ok(Self::from_hz(value * scale))
    }
}

/// Modulation scheme selected on the hardware under test
///
/// This is the mode-select input handed to the PWM/PDM source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ModulationMode {
    /// Traditional PWM: free-running counter compared against the sample
    Pwm,
    /// Improved PDM: bit-reversed counter compared against the sample
    Pdm,
    /// First-order delta-sigma modulation
    SigmaDelta,
}

impl fmt::Display for ModulationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModulationMode::Pwm => "traditional PWM",
            ModulationMode::Pdm => "bit-reversed PDM",
            ModulationMode::SigmaDelta => "sigma-delta",
        };
        f.write_str(name)
    }
}

/// Complete demo configuration
///
/// # Example
/// ```
/// use pdmdemo::config::DemoConfig;
///
/// let mut config = DemoConfig::default();
/// config.filter.num_taps = 1024;
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Decimation filter and rate configuration
    pub filter: FilterConfig,
    /// Stand-in hardware model configuration
    pub simulation: SimulationConfig,
    /// Output artifact configuration
    pub output: OutputConfig,
}

/// Decimation filter configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Input clock rate in Hz; one input bit arrives per clock
    pub clock_rate_hz: f64,
    /// Output audio sample rate in Hz
    pub sample_rate_hz: f64,
    /// Lowpass cutoff frequency in Hz
    pub cutoff_hz: f64,
    /// Filter length (history buffer and tap table size)
    pub num_taps: usize,
}

/// Configuration of the software stand-in for the PWM audio hardware
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Modulation scheme
    pub mode: ModulationMode,
    /// Simulated duration in seconds
    pub duration_secs: f64,
    /// Test tone frequency at the start of the run
    pub tone_start_hz: f64,
    /// Test tone frequency at the end of the run (linear sweep)
    pub tone_stop_hz: f64,
    /// Test tone peak amplitude (0-1 range)
    pub amplitude: f64,
    /// Width of the modulator's compare counter
    pub counter_bits: u32,
    /// Clocks during which the output stage stays shut down
    pub startup_ticks: u64,
    /// RMS of Gaussian noise added to the test tone
    pub noise_rms: f64,
    /// Apply TPDF dither in sigma-delta mode
    pub dither: bool,
    /// Seed for the noise and dither generators (random when absent)
    pub seed: Option<u64>,
}

/// Output artifact configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Raw f64 stream of filtered output samples
    pub samples_path: PathBuf,
    /// Raw f64 dump of the filter taps, for offline inspection
    pub taps_path: Option<PathBuf>,
    /// Mono float WAV copy of the output samples
    pub wav_path: Option<PathBuf>,
    /// Clocks between progress reports (defaults to one simulated millisecond)
    pub progress_interval_ticks: Option<u64>,
}

impl FilterConfig {
    /// Ratio of output rate to input rate; the rate converter's phase step
    pub fn step(&self) -> f64 {
        self.sample_rate_hz / self.clock_rate_hz
    }

    /// Cutoff in cycles per input clock
    pub fn normalized_cutoff(&self) -> f64 {
        self.cutoff_hz / self.clock_rate_hz
    }

    /// Check rates, cutoff and filter length
    ///
    /// # Errors
    /// Returns `PdmError::Config` describing the first violated constraint
    pub fn validate(&self) -> Result<()> {
        if self.num_taps == 0 {
            return Err(PdmError::Config(
                "filter length must be positive".to_string(),
            ));
        }
        for (name, value) in [
            ("clock rate", self.clock_rate_hz),
            ("sample rate", self.sample_rate_hz),
            ("cutoff", self.cutoff_hz),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PdmError::Config(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if self.sample_rate_hz > self.clock_rate_hz {
            return Err(PdmError::Config(format!(
                "sample rate {} Hz exceeds clock rate {} Hz",
                self.sample_rate_hz, self.clock_rate_hz
            )));
        }
        if self.cutoff_hz >= self.clock_rate_hz / 2.0 {
            return Err(PdmError::Config(format!(
                "cutoff {} Hz is at or above the input Nyquist frequency {} Hz",
                self.cutoff_hz,
                self.clock_rate_hz / 2.0
            )));
        }
        Ok(())
    }
}

impl SimulationConfig {
    /// Number of clocks covering `duration_secs`
    pub fn total_ticks(&self, clock_rate_hz: f64) -> u64 {
        (self.duration_secs * clock_rate_hz).round() as u64
    }

    pub fn validate(&self) -> Result<()> {
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(PdmError::Config(format!(
                "duration must be positive, got {}",
                self.duration_secs
            )));
        }
        for (name, value) in [
            ("tone start", self.tone_start_hz),
            ("tone stop", self.tone_stop_hz),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(PdmError::Config(format!(
                    "{} frequency must be positive, got {}",
                    name, value
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.amplitude) {
            return Err(PdmError::Config(format!(
                "amplitude must be within 0-1, got {}",
                self.amplitude
            )));
        }
        if !(1..=24).contains(&self.counter_bits) {
            return Err(PdmError::Config(format!(
                "counter width must be 1-24 bits, got {}",
                self.counter_bits
            )));
        }
        if !(self.noise_rms.is_finite() && self.noise_rms >= 0.0) {
            return Err(PdmError::Config(format!(
                "noise RMS must be finite and not negative, got {}",
                self.noise_rms
            )));
        }
        Ok(())
    }
}

impl OutputConfig {
    pub fn progress_interval(&self, clock_rate_hz: f64) -> u64 {
        self.progress_interval_ticks
            .unwrap_or_else(|| (clock_rate_hz / 1000.0) as u64)
            .max(1)
    }
}

impl DemoConfig {
    /// Parse a TOML document; absent fields keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| PdmError::Config(e.to_string()))
    }

    /// Load a TOML configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.filter.validate()?;
        self.simulation.validate()
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            clock_rate_hz: DEFAULT_CLOCK_RATE_HZ,
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            cutoff_hz: DEFAULT_CUTOFF_HZ,
            num_taps: DEFAULT_NUM_TAPS,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mode: ModulationMode::Pdm,
            duration_secs: 10.0,
            tone_start_hz: 440.0,
            tone_stop_hz: 8000.0,
            amplitude: 0.5,
            counter_bits: 16,
            startup_ticks: 0,
            noise_rms: 0.0,
            dither: false,
            seed: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            samples_path: PathBuf::from("wavfp.dbl"),
            taps_path: Some(PathBuf::from("filter.dbl")),
            wav_path: None,
            progress_interval_ticks: None,
        }
    }
}
