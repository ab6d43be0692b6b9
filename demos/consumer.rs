//! Consumer demo: receive and "display" the broadcast feed
//!
//! Run with: cargo run --example consumer
//!
//! Connects to a producer on localhost, decodes each frame, and logs a
//! one-line summary in place of a real display window. Ctrl+C quits via
//! the cooperative cancellation input, which also announces the
//! unsubscription so the producer releases its camera.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use camcast::{Codec, CodecError, Consumer, ConsumerConfig, DisplaySink, RawFrame};

/// Header-prefix passthrough codec (stand-in for JPEG)
struct DemoCodec;

impl Codec for DemoCodec {
    fn encode(&self, frame: &RawFrame) -> Result<Bytes, CodecError> {
        let mut out = Vec::with_capacity(8 + frame.len());
        out.extend_from_slice(&frame.width.to_be_bytes());
        out.extend_from_slice(&frame.height.to_be_bytes());
        out.extend_from_slice(&frame.data);
        Ok(Bytes::from(out))
    }

    fn decode(&self, data: &[u8]) -> Result<RawFrame, CodecError> {
        if data.len() < 8 {
            return Err(CodecError::Decode("payload shorter than header".into()));
        }
        let width = u32::from_be_bytes(data[0..4].try_into().unwrap());
        let height = u32::from_be_bytes(data[4..8].try_into().unwrap());
        Ok(RawFrame::new(
            width,
            height,
            Bytes::copy_from_slice(&data[8..]),
        ))
    }
}

/// Logging display sink with a Ctrl+C-driven quit flag
struct LogSink {
    frames: u64,
    quit: Arc<AtomicBool>,
}

impl DisplaySink for LogSink {
    fn show(&mut self, frame: RawFrame) {
        self.frames += 1;
        if self.frames % 30 == 0 {
            tracing::info!(
                frames = self.frames,
                width = frame.width,
                height = frame.height,
                bytes = frame.len(),
                "Receiving"
            );
        }
    }

    fn poll_cancel(&mut self) -> bool {
        self.quit.load(Ordering::SeqCst)
    }
}

#[tokio::main]
async fn main() -> camcast::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let quit = Arc::new(AtomicBool::new(false));
    let quit_signal = quit.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        quit_signal.store(true, Ordering::SeqCst);
    });

    let sink = LogSink { frames: 0, quit };
    let consumer = Consumer::connect(ConsumerConfig::default(), DemoCodec, sink).await?;
    consumer.run().await
}
