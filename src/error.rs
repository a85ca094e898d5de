use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdmError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filter design failed: {0}")]
    FilterDesign(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV export failed: {0}")]
    Wav(#[from] hound::Error),
}

pub type Result<T> = std::result::Result<T, PdmError>;
