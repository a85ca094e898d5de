pub mod decimating_fir;
pub mod fir_design;
pub mod history;
pub mod math;
pub mod rate_converter;

pub use decimating_fir::DecimatingFir;
pub use fir_design::FilterCoefficients;
pub use history::HistoryBuffer;
pub use math::{blackman, sinc};
pub use rate_converter::RateConverter;
