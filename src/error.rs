//! Crate error types
//!
//! Errors are split along the system's failure taxonomy: transport faults,
//! capture-device faults, and codec faults. Transient per-iteration failures
//! (empty frame, encode/decode error) are logged and skipped by the loops
//! that hit them; only transport setup and teardown surface through `Result`.

use crate::capture::CaptureError;
use crate::codec::CodecError;
use crate::transport::TransportError;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
#[derive(Debug)]
pub enum Error {
    /// I/O error (socket setup, bind, connect)
    Io(std::io::Error),
    /// Transport-level error
    Transport(TransportError),
    /// Capture device error
    Capture(CaptureError),
    /// Codec error
    Codec(CodecError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Transport(e) => write!(f, "Transport error: {}", e),
            Error::Capture(e) => write!(f, "Capture error: {}", e),
            Error::Codec(e) => write!(f, "Codec error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Transport(e) => Some(e),
            Error::Capture(e) => Some(e),
            Error::Codec(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Error::Transport(e)
    }
}

impl From<CaptureError> for Error {
    fn from(e: CaptureError) -> Self {
        Error::Capture(e)
    }
}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        Error::Codec(e)
    }
}
