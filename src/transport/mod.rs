//! Lightweight publish/subscribe transport
//!
//! Two independent channels connect producer and consumers:
//!
//! ```text
//!                   frame channel (one-way, best-effort)
//!   [FramePublisher] ──────────────────────────────► [FrameSubscriber]
//!        :5555        broadcast::Sender<Bytes>              │
//!                     drop-oldest on lagged peers           │
//!                                                           │
//!   [PresenceListener] ◄──────────────────────────── subscribe /
//!        :5556          Subscribed / Unsubscribed    unsubscribe
//!                       (marker byte or EOF)         announcement
//! ```
//!
//! The frame channel carries opaque compressed frames producer → consumers;
//! fan-out uses `tokio::sync::broadcast`, so a slow subscriber lags and
//! drops the oldest frames rather than stalling the producer. The presence
//! channel carries only subscription announcements consumer → producer and
//! is the producer's sole connection-liveness signal: the transport has no
//! native "client connected" notion, so arrival and departure are inferred
//! from announcement messages and connection teardown.

pub mod config;
pub mod presence;
pub mod publisher;
pub mod subscriber;
pub mod wire;

pub use config::TransportConfig;
pub use presence::{PresenceEvent, PresenceListener};
pub use publisher::FramePublisher;
pub use subscriber::FrameSubscriber;

/// Transport-level error
#[derive(Debug, Clone)]
pub enum TransportError {
    /// The channel was torn down while the peer still needed it
    Closed,
    /// A message exceeded the wire-format size limit
    MessageTooLarge {
        /// Declared payload size
        size: usize,
        /// Allowed maximum
        max: usize,
    },
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Closed => write!(f, "Transport channel closed"),
            TransportError::MessageTooLarge { size, max } => {
                write!(f, "Message of {} bytes exceeds maximum of {}", size, max)
            }
        }
    }
}

impl std::error::Error for TransportError {}
