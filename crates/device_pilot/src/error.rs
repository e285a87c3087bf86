//! Error types for device operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("Command timeout: {0}")]
    Timeout(String),

    #[error("Malformed bounds attribute: {0:?}")]
    MalformedBounds(String),

    #[error("Invalid query pattern: {0}")]
    InvalidPattern(String),

    #[error("UI dump unavailable after {0} recovery cycles")]
    DumpUnavailable(usize),

    #[error("Dump parse error: {0}")]
    Dump(#[from] roxmltree::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, DeviceError>;
