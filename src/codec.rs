//! Frame codec collaborator
//!
//! Compression is out of scope (typically JPEG); the pipeline drives it
//! through this trait. Encode and decode failures are transient-skip
//! conditions: the current frame is dropped with a warning and the loop
//! continues.

use bytes::Bytes;

use crate::frame::RawFrame;

/// Error from the codec collaborator
#[derive(Debug, Clone)]
pub enum CodecError {
    /// Encoding a raw frame failed
    Encode(String),
    /// Decoding a wire payload failed (malformed or corrupt bytes)
    Decode(String),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::Encode(reason) => write!(f, "Frame encoding failed: {}", reason),
            CodecError::Decode(reason) => write!(f, "Frame decoding failed: {}", reason),
        }
    }
}

impl std::error::Error for CodecError {}

/// Raw-frame ⇄ wire-bytes codec
///
/// For any nonzero frame, `decode(encode(frame))` must yield a displayable
/// frame without error (fidelity may be lossy). Callers never pass an empty
/// frame to `encode`; emptiness is checked upstream.
pub trait Codec {
    /// Compress a raw frame into wire bytes
    fn encode(&self, frame: &RawFrame) -> Result<Bytes, CodecError>;

    /// Decompress wire bytes into a raw frame
    fn decode(&self, data: &[u8]) -> Result<RawFrame, CodecError>;
}
