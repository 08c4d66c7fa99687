// Error handling for audio output

use std::fmt;

/// Audio output error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// Failed to bring up the output unit or attach the render callback
    InitializationError(String),

    /// Device error (no default output, device query failed)
    DeviceError(String),

    /// Requested sample format is not in the format table
    UnsupportedFormat(String),

    /// Device rejected the requested stream format
    StreamFormatError(String),

    /// Starting or restarting the stream failed
    PlaybackError(String),

    /// Invalid state transition
    InvalidState(String),

    /// Generic error
    Other(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AudioError::InitializationError(msg) => write!(f, "Initialization error: {}", msg),
            AudioError::DeviceError(msg) => write!(f, "Device error: {}", msg),
            AudioError::UnsupportedFormat(msg) => write!(f, "Unsupported format: {}", msg),
            AudioError::StreamFormatError(msg) => write!(f, "Stream format error: {}", msg),
            AudioError::PlaybackError(msg) => write!(f, "Playback error: {}", msg),
            AudioError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            AudioError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for AudioError {}

/// Result type alias for audio operations
pub type Result<T> = std::result::Result<T, AudioError>;
