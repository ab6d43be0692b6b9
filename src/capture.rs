//! Capture device collaborator
//!
//! The camera itself is out of scope; the producer drives it through this
//! trait. The device is the single exclusive resource in the system: it is
//! held only while a consumer is attached, and the producer guarantees
//! `release` is called exactly once per successful `open` before the next
//! idle period.

use crate::frame::RawFrame;

/// Error opening or driving a capture device
#[derive(Debug, Clone)]
pub enum CaptureError {
    /// The device could not be opened
    OpenFailed {
        /// Device that failed to open
        device_id: u32,
        /// Driver-level reason
        reason: String,
    },
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::OpenFailed { device_id, reason } => {
                write!(f, "Could not open capture device {}: {}", device_id, reason)
            }
        }
    }
}

impl std::error::Error for CaptureError {}

/// A camera-like frame source
///
/// Contract:
/// - `open` acquires the device; on failure nothing is acquired and `read`
///   must not be called.
/// - `read` returns the next frame, or an empty frame on a dropped capture
///   (a transient condition, not an error).
/// - `release` returns the device to the system; callers only invoke it
///   after a successful `open`.
pub trait Capture {
    /// Acquire the device
    fn open(&mut self, device_id: u32) -> Result<(), CaptureError>;

    /// Read one frame; may legitimately be empty
    fn read(&mut self) -> RawFrame;

    /// Release the device
    fn release(&mut self);
}
