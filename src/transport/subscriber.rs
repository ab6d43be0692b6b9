//! Consumer-side frame subscriber
//!
//! Connects to both channels: the frame channel for the stream itself and
//! the presence channel to announce attachment. Frames are drained by an
//! internal reader task and handed out through a bounded queue, which keeps
//! `recv` safe to race against a timeout: a cancelled `recv` can never
//! tear a message in half.

use std::net::SocketAddr;

use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::wire::{self, SUBSCRIBE_MARKER, UNSUBSCRIBE_MARKER};

/// Depth of the local receive queue (frames)
const RECV_QUEUE_DEPTH: usize = 16;

/// Subscribing side of the transport
pub struct FrameSubscriber {
    frames: mpsc::Receiver<Bytes>,
    presence: TcpStream,
    reader_handle: JoinHandle<()>,
}

impl FrameSubscriber {
    /// Connect to a producer and announce the subscription
    ///
    /// The frame connection is established first so no frame published in
    /// response to the announcement is missed.
    pub async fn connect(
        frame_addr: SocketAddr,
        presence_addr: SocketAddr,
    ) -> std::io::Result<Self> {
        let frame_conn = TcpStream::connect(frame_addr).await?;
        let _ = frame_conn.set_nodelay(true);

        let mut presence = TcpStream::connect(presence_addr).await?;
        wire::write_message(&mut presence, &[SUBSCRIBE_MARKER]).await?;

        tracing::info!(
            frame = %frame_addr,
            presence = %presence_addr,
            "Connected to producer"
        );

        let (tx, rx) = mpsc::channel(RECV_QUEUE_DEPTH);
        let reader_handle = tokio::spawn(drain_frames(frame_conn, tx));

        Ok(Self {
            frames: rx,
            presence,
            reader_handle,
        })
    }

    /// Receive the next frame payload
    ///
    /// Returns `None` when the transport is torn down, the only signal
    /// that ends a consumer's receive loop. An empty payload is returned
    /// as `Some` (a present-but-empty message, not teardown).
    pub async fn recv(&mut self) -> Option<Bytes> {
        self.frames.recv().await
    }

    /// Announce departure and close the subscription
    pub async fn close(&mut self) {
        if let Err(e) = wire::write_message(&mut self.presence, &[UNSUBSCRIBE_MARKER]).await {
            tracing::debug!(error = %e, "Unsubscribe announcement not delivered");
        }
        let _ = self.presence.shutdown().await;
        self.reader_handle.abort();
    }
}

impl Drop for FrameSubscriber {
    fn drop(&mut self) {
        // The presence connection closing is itself a departure signal.
        self.reader_handle.abort();
    }
}

/// Pump the frame connection into the local queue until teardown
async fn drain_frames(mut conn: TcpStream, tx: mpsc::Sender<Bytes>) {
    loop {
        match wire::read_message(&mut conn).await {
            Ok(Some(payload)) => {
                if tx.send(payload).await.is_err() {
                    break;
                }
            }
            Ok(None) => {
                tracing::info!("Frame channel closed by producer");
                break;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Frame channel read failed");
                break;
            }
        }
    }
}
