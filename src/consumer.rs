//! Consumer: frame receiver and display driver
//!
//! Subscribes to the frame channel, decodes each payload, and forwards it
//! to the display sink. The receive is bounded by a timeout so the local
//! cancellation input is polled at least once per `recv_timeout` even when
//! no frames arrive; transport teardown is the only other way the loop
//! ends.

use std::net::SocketAddr;
use std::time::Duration;

use crate::codec::Codec;
use crate::display::DisplaySink;
use crate::error::Result;
use crate::transport::config::{DEFAULT_FRAME_PORT, DEFAULT_PRESENCE_PORT};
use crate::transport::FrameSubscriber;

/// Default bound on a single blocking receive
pub const DEFAULT_RECV_TIMEOUT: Duration = Duration::from_millis(100);

/// Consumer configuration options
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Producer's frame-channel address
    pub frame_addr: SocketAddr,

    /// Producer's presence-channel address
    pub presence_addr: SocketAddr,

    /// Bound on a single receive, after which the cancellation input is
    /// polled and the receive retried
    pub recv_timeout: Duration,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            frame_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_FRAME_PORT)),
            presence_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PRESENCE_PORT)),
            recv_timeout: DEFAULT_RECV_TIMEOUT,
        }
    }
}

impl ConsumerConfig {
    /// Set the frame-channel address
    pub fn frame_addr(mut self, addr: SocketAddr) -> Self {
        self.frame_addr = addr;
        self
    }

    /// Set the presence-channel address
    pub fn presence_addr(mut self, addr: SocketAddr) -> Self {
        self.presence_addr = addr;
        self
    }

    /// Set the receive timeout
    pub fn recv_timeout(mut self, timeout: Duration) -> Self {
        self.recv_timeout = timeout;
        self
    }
}

/// Live-feed consumer
pub struct Consumer<D: Codec, S: DisplaySink> {
    subscriber: FrameSubscriber,
    codec: D,
    sink: S,
    config: ConsumerConfig,
}

impl<D: Codec, S: DisplaySink> Consumer<D, S> {
    /// Connect to a producer and announce the subscription
    pub async fn connect(config: ConsumerConfig, codec: D, sink: S) -> Result<Self> {
        let subscriber = FrameSubscriber::connect(config.frame_addr, config.presence_addr).await?;
        Ok(Self {
            subscriber,
            codec,
            sink,
            config,
        })
    }

    /// Build a consumer over an already-connected subscriber
    pub fn with_subscriber(
        config: ConsumerConfig,
        codec: D,
        sink: S,
        subscriber: FrameSubscriber,
    ) -> Self {
        Self {
            subscriber,
            codec,
            sink,
            config,
        }
    }

    /// Run the receive/decode/display loop
    ///
    /// Returns cleanly on transport teardown or local cancellation. Empty
    /// messages and decode failures are warned about and skipped; they
    /// never terminate the loop.
    pub async fn run(mut self) -> Result<()> {
        tracing::info!("Receiving video stream");

        loop {
            let payload =
                match tokio::time::timeout(self.config.recv_timeout, self.subscriber.recv()).await
                {
                    Ok(Some(payload)) => payload,
                    Ok(None) => {
                        tracing::info!("Producer disconnected, exiting");
                        break;
                    }
                    Err(_) => {
                        // No frame this interval; keep the quit check alive.
                        if self.sink.poll_cancel() {
                            tracing::info!("Quit requested, unsubscribing");
                            self.subscriber.close().await;
                            break;
                        }
                        continue;
                    }
                };

            if payload.is_empty() {
                tracing::warn!("Received empty frame, skipping");
                continue;
            }

            let frame = match self.codec.decode(&payload) {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to decode frame, skipping");
                    continue;
                }
            };

            if frame.is_empty() {
                tracing::warn!("Decoded frame is empty, skipping");
                continue;
            }

            self.sink.show(frame);

            if self.sink.poll_cancel() {
                tracing::info!("Quit requested, unsubscribing");
                self.subscriber.close().await;
                break;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use bytes::Bytes;
    use tokio::time::timeout;

    use crate::codec::CodecError;
    use crate::frame::RawFrame;
    use crate::transport::{FramePublisher, PresenceEvent, PresenceListener, TransportConfig};

    use super::*;
    use std::result::Result;

    /// Codec double: rejects payloads that don't start with a magic byte
    struct FakeCodec;

    const MAGIC: u8 = 0xAB;

    impl Codec for FakeCodec {
        fn encode(&self, frame: &RawFrame) -> Result<Bytes, CodecError> {
            let mut out = Vec::with_capacity(1 + frame.len());
            out.push(MAGIC);
            out.extend_from_slice(&frame.data);
            Ok(Bytes::from(out))
        }

        fn decode(&self, data: &[u8]) -> Result<RawFrame, CodecError> {
            match data.split_first() {
                Some((&MAGIC, pixels)) => {
                    Ok(RawFrame::new(1, 1, Bytes::copy_from_slice(pixels)))
                }
                _ => Err(CodecError::Decode("bad magic".into())),
            }
        }
    }

    /// Sink double recording shown frames, with a switchable cancel flag
    #[derive(Clone, Default)]
    struct FakeSink {
        shown: Arc<Mutex<Vec<RawFrame>>>,
        show_count: Arc<AtomicU32>,
        cancel: Arc<AtomicBool>,
    }

    impl DisplaySink for FakeSink {
        fn show(&mut self, frame: RawFrame) {
            self.shown.lock().unwrap().push(frame);
            self.show_count.fetch_add(1, Ordering::SeqCst);
        }

        fn poll_cancel(&mut self) -> bool {
            self.cancel.load(Ordering::SeqCst)
        }
    }

    struct Harness {
        publisher: FramePublisher,
        presence: PresenceListener,
        config: ConsumerConfig,
    }

    async fn harness() -> Harness {
        let transport = TransportConfig::default()
            .frame_addr("127.0.0.1:0".parse().unwrap())
            .presence_addr("127.0.0.1:0".parse().unwrap());
        let publisher = FramePublisher::bind(&transport).await.unwrap();
        let presence = PresenceListener::bind(&transport).await.unwrap();
        let config = ConsumerConfig::default()
            .frame_addr(publisher.local_addr())
            .presence_addr(presence.local_addr())
            .recv_timeout(Duration::from_millis(20));
        Harness {
            publisher,
            presence,
            config,
        }
    }

    async fn wait_until<F: Fn() -> bool>(cond: F) {
        timeout(Duration::from_secs(2), async {
            while !cond() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    #[tokio::test]
    async fn test_valid_frames_are_shown() {
        let h = harness().await;
        let sink = FakeSink::default();
        let shown = sink.shown.clone();

        let consumer = Consumer::connect(h.config, FakeCodec, sink).await.unwrap();
        let handle = tokio::spawn(consumer.run());

        wait_until(|| h.publisher.subscriber_count() == 1).await;
        h.publisher.publish(FakeCodec.encode(&RawFrame::new(1, 1, Bytes::from_static(&[7]))).unwrap());

        wait_until(|| !shown.lock().unwrap().is_empty()).await;
        assert_eq!(shown.lock().unwrap()[0].data[..], [7]);

        handle.abort();
    }

    #[tokio::test]
    async fn test_empty_message_skipped_without_terminating() {
        let h = harness().await;
        let sink = FakeSink::default();
        let shown = sink.shown.clone();

        let consumer = Consumer::connect(h.config, FakeCodec, sink).await.unwrap();
        let handle = tokio::spawn(consumer.run());

        wait_until(|| h.publisher.subscriber_count() == 1).await;

        // Empty message is a protocol violation, not a termination signal.
        h.publisher.publish(Bytes::new());
        h.publisher.publish(FakeCodec.encode(&RawFrame::new(1, 1, Bytes::from_static(&[9]))).unwrap());

        wait_until(|| !shown.lock().unwrap().is_empty()).await;
        let frames = shown.lock().unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data[..], [9]);
        drop(frames);

        handle.abort();
    }

    #[tokio::test]
    async fn test_malformed_frame_skipped() {
        let h = harness().await;
        let sink = FakeSink::default();
        let shown = sink.shown.clone();

        let consumer = Consumer::connect(h.config, FakeCodec, sink).await.unwrap();
        let handle = tokio::spawn(consumer.run());

        wait_until(|| h.publisher.subscriber_count() == 1).await;

        h.publisher.publish(Bytes::from_static(&[0xFF, 1, 2, 3])); // bad magic
        h.publisher.publish(FakeCodec.encode(&RawFrame::new(1, 1, Bytes::from_static(&[5]))).unwrap());

        wait_until(|| !shown.lock().unwrap().is_empty()).await;
        assert_eq!(shown.lock().unwrap().len(), 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_transport_teardown_ends_loop_cleanly() {
        let h = harness().await;
        let sink = FakeSink::default();
        let show_count = sink.show_count.clone();

        let consumer = Consumer::connect(h.config, FakeCodec, sink).await.unwrap();
        let handle = tokio::spawn(consumer.run());

        wait_until(|| h.publisher.subscriber_count() == 1).await;
        drop(h.publisher);

        let result = timeout(Duration::from_secs(2), handle).await.unwrap().unwrap();
        assert!(result.is_ok());
        assert_eq!(show_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancel_exits_and_unsubscribes() {
        let mut h = harness().await;
        let sink = FakeSink::default();
        let cancel = sink.cancel.clone();

        let consumer = Consumer::connect(h.config, FakeCodec, sink).await.unwrap();
        let handle = tokio::spawn(consumer.run());

        let event = timeout(Duration::from_secs(1), h.presence.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event, PresenceEvent::Subscribed);

        // Cancel fires on the next timeout poll even with no frames flowing.
        cancel.store(true, Ordering::SeqCst);

        let result = timeout(Duration::from_secs(2), handle).await.unwrap().unwrap();
        assert!(result.is_ok());

        let event = timeout(Duration::from_secs(1), h.presence.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event, PresenceEvent::Unsubscribed);
    }
}
