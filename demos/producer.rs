//! Producer demo: broadcast a synthetic camera feed
//!
//! Run with: cargo run --example producer
//!
//! Binds the frame channel on :5555 and the presence channel on :5556,
//! then waits for a consumer. The camera is synthetic (a moving gradient)
//! and the codec is a trivial header-prefix passthrough, standing in for
//! the real capture device and JPEG codec. Pair with the consumer demo:
//!
//!   cargo run --example consumer

use bytes::Bytes;
use camcast::{Capture, CaptureError, Codec, CodecError, Producer, ProducerConfig, RawFrame};

const WIDTH: u32 = 64;
const HEIGHT: u32 = 48;

/// Synthetic camera producing a moving gradient
#[derive(Default)]
struct GradientCamera {
    open: bool,
    tick: u8,
}

impl Capture for GradientCamera {
    fn open(&mut self, device_id: u32) -> Result<(), CaptureError> {
        if self.open {
            return Err(CaptureError::OpenFailed {
                device_id,
                reason: "already open".into(),
            });
        }
        self.open = true;
        Ok(())
    }

    fn read(&mut self) -> RawFrame {
        self.tick = self.tick.wrapping_add(1);
        let tick = self.tick;
        let pixels: Vec<u8> = (0..(WIDTH * HEIGHT))
            .map(|i| (i as u8).wrapping_add(tick))
            .collect();
        RawFrame::new(WIDTH, HEIGHT, Bytes::from(pixels))
    }

    fn release(&mut self) {
        self.open = false;
    }
}

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

#[tokio::main]
async fn main() -> camcast::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut producer =
        Producer::bind(ProducerConfig::default(), GradientCamera::default(), DemoCodec).await?;

    producer
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}
