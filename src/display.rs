//! Display sink collaborator
//!
//! Rendering, windowing, and key handling are out of scope; the consumer
//! loop hands decoded frames to this trait and polls it for a local quit
//! signal once per iteration.

use crate::frame::RawFrame;

/// Where decoded frames go on the consumer side
pub trait DisplaySink {
    /// Present one decoded frame
    fn show(&mut self, frame: RawFrame);

    /// Non-blocking check of the local cancellation input
    ///
    /// Returns `true` when the user asked to quit (e.g. a key press).
    fn poll_cancel(&mut self) -> bool;
}
