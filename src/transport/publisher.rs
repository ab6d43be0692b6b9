//! Frame-channel publisher
//!
//! Binds the frame address and fans published frames out to every connected
//! subscriber. Fan-out goes through `tokio::sync::broadcast`: `Bytes` is
//! reference-counted, so all subscribers share one allocation, and a
//! subscriber that falls behind the bounded queue depth lags: the channel
//! drops its oldest frames and the per-peer writer skips ahead, so the
//! producer never blocks on a slow or dead consumer.

use std::net::SocketAddr;

use bytes::Bytes;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::config::TransportConfig;
use super::wire;

/// Publishing side of the frame channel
pub struct FramePublisher {
    tx: broadcast::Sender<Bytes>,
    local_addr: SocketAddr,
    accept_handle: JoinHandle<()>,
}

impl FramePublisher {
    /// Bind the frame channel and start accepting subscribers
    ///
    /// Bind failure is fatal; there is no service without the channel.
    pub async fn bind(config: &TransportConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind(config.frame_addr).await?;
        let local_addr = listener.local_addr()?;
        let (tx, _) = broadcast::channel(config.queue_depth);

        tracing::info!(addr = %local_addr, "Frame channel listening");

        let accept_tx = tx.clone();
        let tcp_nodelay = config.tcp_nodelay;
        let accept_handle = tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((socket, peer_addr)) => {
                        if tcp_nodelay {
                            let _ = socket.set_nodelay(true);
                        }
                        tracing::debug!(peer = %peer_addr, "Frame subscriber connected");
                        let rx = accept_tx.subscribe();
                        tokio::spawn(feed_subscriber(socket, peer_addr, rx));
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to accept frame subscriber");
                    }
                }
            }
        });

        Ok(Self {
            tx,
            local_addr,
            accept_handle,
        })
    }

    /// Publish one frame to all connected subscribers
    ///
    /// Fire-and-forget: delivery is best-effort and a send with no
    /// subscribers is not an error.
    pub fn publish(&self, frame: Bytes) {
        let _ = self.tx.send(frame);
    }

    /// Number of currently attached subscriber queues
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// The bound frame-channel address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Drop for FramePublisher {
    fn drop(&mut self) {
        self.accept_handle.abort();
    }
}

/// Drain the broadcast queue into one subscriber socket
async fn feed_subscriber(
    mut socket: TcpStream,
    peer_addr: SocketAddr,
    mut rx: broadcast::Receiver<Bytes>,
) {
    loop {
        match rx.recv().await {
            Ok(frame) => {
                if let Err(e) = wire::write_message(&mut socket, &frame[..]).await {
                    tracing::debug!(peer = %peer_addr, error = %e, "Frame subscriber gone");
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(dropped)) => {
                tracing::warn!(
                    peer = %peer_addr,
                    dropped = dropped,
                    "Slow subscriber, dropped oldest frames"
                );
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
