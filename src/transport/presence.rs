//! Presence-channel listener
//!
//! The transport has no native "client connected" signal, so the producer
//! infers consumer arrival and departure from this channel: a consumer
//! announces itself with a subscribe marker when it attaches, and an
//! unsubscribe marker, or simply its connection closing, announces its
//! departure. Events from all consumers funnel into one queue; the producer
//! treats them as a single aggregate presence signal rather than tracking
//! individual consumers.

use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::config::TransportConfig;
use super::wire::{self, SUBSCRIBE_MARKER, UNSUBSCRIBE_MARKER};

/// A subscription-announcement event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceEvent {
    /// A consumer attached to the stream
    Subscribed,
    /// A consumer departed (explicit announcement or connection teardown)
    Unsubscribed,
}

/// Producer-side receiver of presence events
pub struct PresenceListener {
    rx: mpsc::UnboundedReceiver<PresenceEvent>,
    local_addr: SocketAddr,
    accept_handle: JoinHandle<()>,
}

impl PresenceListener {
    /// Bind the presence channel and start watching for announcements
    ///
    /// Bind failure is fatal; without the channel the producer can never
    /// learn that a consumer exists.
    pub async fn bind(config: &TransportConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind(config.presence_addr).await?;
        let local_addr = listener.local_addr()?;
        let (tx, rx) = mpsc::unbounded_channel();

        tracing::info!(addr = %local_addr, "Presence channel listening");

        let accept_handle = tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((socket, peer_addr)) => {
                        tokio::spawn(watch_consumer(socket, peer_addr, tx.clone()));
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to accept presence connection");
                    }
                }
            }
        });

        Ok(Self {
            rx,
            local_addr,
            accept_handle,
        })
    }

    /// Wait for the next presence event
    ///
    /// Blocks while the producer is idle. Returns `None` only when the
    /// listener itself is torn down.
    pub async fn recv(&mut self) -> Option<PresenceEvent> {
        self.rx.recv().await
    }

    /// Non-blocking check for a pending presence event
    ///
    /// Used once per capture/publish iteration so the streaming loop is
    /// never starved by presence polling.
    pub fn try_recv(&mut self) -> Option<PresenceEvent> {
        self.rx.try_recv().ok()
    }

    /// The bound presence-channel address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Drop for PresenceListener {
    fn drop(&mut self) {
        self.accept_handle.abort();
    }
}

/// Translate one consumer's presence connection into events
///
/// Emits `Subscribed` on a valid announcement, then `Unsubscribed` exactly
/// once when the consumer either announces departure or its connection
/// closes. A connection that never announces produces no events.
async fn watch_consumer(
    mut socket: TcpStream,
    peer_addr: SocketAddr,
    tx: mpsc::UnboundedSender<PresenceEvent>,
) {
    // First message must be the subscribe announcement.
    match wire::read_message(&mut socket).await {
        Ok(Some(msg)) if msg.first() == Some(&SUBSCRIBE_MARKER) => {
            tracing::debug!(peer = %peer_addr, "Subscribe announcement");
            if tx.send(PresenceEvent::Subscribed).is_err() {
                return;
            }
        }
        Ok(Some(msg)) => {
            tracing::warn!(
                peer = %peer_addr,
                marker = ?msg.first(),
                "Malformed presence announcement, ignoring connection"
            );
            return;
        }
        Ok(None) => return,
        Err(e) => {
            tracing::debug!(peer = %peer_addr, error = %e, "Presence connection error");
            return;
        }
    }

    // Watch for an explicit unsubscribe or connection teardown.
    loop {
        match wire::read_message(&mut socket).await {
            Ok(Some(msg)) if msg.first() == Some(&UNSUBSCRIBE_MARKER) => {
                tracing::debug!(peer = %peer_addr, "Unsubscribe announcement");
                break;
            }
            Ok(Some(_)) => {
                // Repeated subscribe markers carry no new information.
                tracing::debug!(peer = %peer_addr, "Duplicate presence announcement");
            }
            Ok(None) => {
                tracing::debug!(peer = %peer_addr, "Presence connection closed");
                break;
            }
            Err(e) => {
                tracing::debug!(peer = %peer_addr, error = %e, "Presence connection error");
                break;
            }
        }
    }

    let _ = tx.send(PresenceEvent::Unsubscribed);
}
