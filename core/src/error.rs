use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid metadata in {field}: {raw:?}")]
    InvalidMetadata { field: &'static str, raw: String },
    #[error("engine fault: {0}")]
    EngineFault(String),
    #[error("resample overflow at index {index} (base {base}, last valid {last_valid})")]
    ResampleOverflow {
        index: usize,
        base: usize,
        last_valid: usize,
    },
    #[error("render cancelled")]
    Cancelled,
    #[error("WAV encoding error: {0}")]
    Wav(#[from] hound::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<libloading::Error> for RenderError {
    fn from(err: libloading::Error) -> Self {
        RenderError::EngineFault(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
