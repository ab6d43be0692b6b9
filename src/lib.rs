//! camcast: live camera broadcast over a lightweight pub/sub transport
//!
//! One producer owns a capture device and broadcasts compressed frames to
//! any number of consumers. The transport provides no native "client
//! connected" signal, so the producer manages the camera from presence
//! announcements alone: the device is opened when the first subscribe
//! announcement arrives and released when presence activity signals that
//! the consumer group departed.
//!
//! # Architecture
//!
//! ```text
//!   [Capture] ─► Producer ─► [Codec::encode] ─► FramePublisher ─► :5555
//!                  ▲  state machine:                                │
//!                  │  Idle ⇄ Streaming                              ▼
//!               :5556 ◄─ PresenceListener ◄── announce ── FrameSubscriber
//!                                                              │
//!                        [DisplaySink] ◄─ [Codec::decode] ◄── Consumer
//! ```
//!
//! Capture, codec, and display are external collaborators behind traits;
//! this crate owns the connection lifecycle and the transport plumbing.
//!
//! # Example
//!
//! ```no_run
//! use camcast::{Consumer, ConsumerConfig, Producer, ProducerConfig};
//!
//! # async fn example<C, E, D, S>(capture: C, codec: E, decoder: D, sink: S)
//! #     -> camcast::Result<()>
//! # where
//! #     C: camcast::Capture + Send + 'static,
//! #     E: camcast::Codec + Send + 'static,
//! #     D: camcast::Codec,
//! #     S: camcast::DisplaySink,
//! # {
//! // Producer side: serve frames while a consumer is attached.
//! let mut producer = Producer::bind(ProducerConfig::default(), capture, codec).await?;
//! tokio::spawn(async move { producer.run().await });
//!
//! // Consumer side: receive, decode, display.
//! let consumer = Consumer::connect(ConsumerConfig::default(), decoder, sink).await?;
//! consumer.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod codec;
pub mod consumer;
pub mod display;
pub mod error;
pub mod frame;
pub mod producer;
pub mod transport;

pub use capture::{Capture, CaptureError};
pub use codec::{Codec, CodecError};
pub use consumer::{Consumer, ConsumerConfig};
pub use display::DisplaySink;
pub use error::{Error, Result};
pub use frame::RawFrame;
pub use producer::{EpisodePhase, EpisodeState, Producer, ProducerConfig};
pub use transport::{
    FramePublisher, FrameSubscriber, PresenceEvent, PresenceListener, TransportConfig,
    TransportError,
};
