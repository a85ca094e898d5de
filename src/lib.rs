pub mod config;
pub mod constants;
pub mod dbl;
pub mod demo;
pub mod error;
pub mod signal_processing;
pub mod source;
pub mod wav;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::DemoConfig;
pub use error::{PdmError, Result};
pub use signal_processing::{DecimatingFir, FilterCoefficients};
pub use source::{PwmOutput, PwmSource};
pub use wav::save_wav;
