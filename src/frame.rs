//! Frame types
//!
//! Two representations flow through the system: a `RawFrame` is a decoded
//! pixel buffer handed to/from the capture, codec, and display collaborators;
//! on the wire a frame is an opaque `bytes::Bytes` payload produced by the
//! codec, with no application-level header (no sequence number, timestamp,
//! or resolution metadata; the codec output is self-describing).
//!
//! `Bytes` is reference-counted, so publishing a frame to multiple
//! subscribers shares one allocation rather than copying per subscriber.

use bytes::Bytes;

/// A decoded pixel buffer
///
/// Pixel layout is a contract between the capture, codec, and display
/// collaborators; this crate only inspects the buffer for emptiness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel data (zero-copy via reference counting)
    pub data: Bytes,
}

impl RawFrame {
    /// Create a frame from a pixel buffer
    pub fn new(width: u32, height: u32, data: Bytes) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Create an empty frame
    ///
    /// Capture devices legitimately return empty frames on a dropped read;
    /// the pipeline treats them as transient and never encodes them.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Bytes::new(),
        }
    }

    /// Whether this frame carries no pixel data
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Pixel buffer length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_frame() {
        let frame = RawFrame::empty();
        assert!(frame.is_empty());
        assert_eq!(frame.len(), 0);
        assert_eq!(frame.width, 0);
        assert_eq!(frame.height, 0);
    }

    #[test]
    fn test_nonempty_frame() {
        let frame = RawFrame::new(2, 2, Bytes::from_static(&[0, 1, 2, 3]));
        assert!(!frame.is_empty());
        assert_eq!(frame.len(), 4);
    }
}
