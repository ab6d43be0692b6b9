//! Producer: camera owner and frame broadcaster
//!
//! Runs the connection-lifecycle state machine. While `Idle` the producer
//! blocks on the presence channel; the first announcement wakes it, the
//! camera is acquired, and a capture → encode → publish loop runs until
//! presence activity signals departure, at which point the camera is
//! released and the producer goes back to waiting. The service loop has no
//! terminal state; only presence-channel teardown ends it.

pub mod config;
pub mod episode;

pub use config::ProducerConfig;
pub use episode::{EpisodePhase, EpisodeState};

use crate::capture::Capture;
use crate::codec::Codec;
use crate::error::Result;
use crate::transport::{FramePublisher, PresenceEvent, PresenceListener, TransportError};

/// How one streaming episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EpisodeEnd {
    /// Presence activity signalled that the consumer departed
    ConsumerDeparted,
    /// Too many consecutive transient failures
    FailureStreak,
}

/// Live-feed producer
pub struct Producer<C: Capture, E: Codec> {
    capture: C,
    codec: E,
    publisher: FramePublisher,
    presence: PresenceListener,
    config: ProducerConfig,
    state: EpisodeState,
}

impl<C: Capture, E: Codec> Producer<C, E> {
    /// Bind both transport channels and build a producer
    ///
    /// Bind failure is fatal and propagates immediately.
    pub async fn bind(config: ProducerConfig, capture: C, codec: E) -> Result<Self> {
        let publisher = FramePublisher::bind(&config.transport).await?;
        let presence = PresenceListener::bind(&config.transport).await?;
        Ok(Self::with_transport(config, capture, codec, publisher, presence))
    }

    /// Build a producer over already-bound transport channels
    pub fn with_transport(
        config: ProducerConfig,
        capture: C,
        codec: E,
        publisher: FramePublisher,
        presence: PresenceListener,
    ) -> Self {
        Self {
            capture,
            codec,
            publisher,
            presence,
            config,
            state: EpisodeState::new(),
        }
    }

    /// The bound frame-channel address
    pub fn frame_addr(&self) -> std::net::SocketAddr {
        self.publisher.local_addr()
    }

    /// The bound presence-channel address
    pub fn presence_addr(&self) -> std::net::SocketAddr {
        self.presence.local_addr()
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> EpisodePhase {
        self.state.phase()
    }

    /// Run the service loop
    ///
    /// Never returns in normal operation; errors only on presence-channel
    /// teardown.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.wait_for_consumer().await?;

            match self.capture.open(self.config.device_id) {
                Ok(()) => {
                    self.state.begin_episode();
                    tracing::info!(
                        device_id = self.config.device_id,
                        episode = self.state.episodes_started(),
                        "Consumer connected, camera opened"
                    );
                }
                Err(e) => {
                    // Stay idle; the next subscribe announcement retries.
                    tracing::error!(
                        device_id = self.config.device_id,
                        error = %e,
                        "Could not open camera, episode skipped"
                    );
                    continue;
                }
            }

            let end = self.stream_episode().await;
            self.capture.release();
            self.state.end_episode();

            match end {
                EpisodeEnd::ConsumerDeparted => {
                    tracing::info!("Consumer departed, camera released");
                }
                EpisodeEnd::FailureStreak => {
                    tracing::warn!(
                        failures = self.config.max_consecutive_failures,
                        "Capture pipeline stalled, camera released"
                    );
                }
            }
        }
    }

    /// Run the service loop until a shutdown signal completes
    ///
    /// The camera is released before returning if an episode was active.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()>,
    {
        let result = tokio::select! {
            _ = shutdown => {
                tracing::info!("Shutdown signal received");
                None
            }
            result = self.run() => Some(result),
        };

        match result {
            Some(result) => result,
            None => {
                if self.state.is_streaming() {
                    self.capture.release();
                    self.state.end_episode();
                    tracing::info!("Camera released on shutdown");
                }
                Ok(())
            }
        }
    }

    /// Block while `Idle` until the consumer group is attached
    ///
    /// The transport announces attachment automatically and the producer
    /// does not distinguish individual consumers, so announcements that
    /// queued up while idle are drained in order and the latest one decides:
    /// a trailing subscribe starts the episode, while a trailing departure
    /// means the group already emptied again and the camera stays closed.
    /// Duplicate subscribe signals collapse into a single transition, never
    /// a double-acquire, and a queued departure is never mistaken for one.
    async fn wait_for_consumer(&mut self) -> Result<()> {
        tracing::info!("Waiting for a consumer to connect");

        loop {
            let mut latest = match self.presence.recv().await {
                Some(event) => event,
                None => return Err(TransportError::Closed.into()),
            };
            tracing::debug!(event = ?latest, "Presence event while idle");

            while let Some(extra) = self.presence.try_recv() {
                tracing::debug!(event = ?extra, "Coalesced queued presence event");
                latest = extra;
            }

            match latest {
                PresenceEvent::Subscribed => return Ok(()),
                PresenceEvent::Unsubscribed => {
                    tracing::debug!("Consumer group departed while idle, still waiting");
                }
            }
        }
    }

    /// Capture → encode → publish until departure or a failure streak
    ///
    /// The presence check after each publish is non-blocking so presence
    /// polling never starves the capture loop.
    async fn stream_episode(&mut self) -> EpisodeEnd {
        loop {
            let frame = self.capture.read();
            if frame.is_empty() {
                tracing::warn!("Captured empty frame, skipping");
                if self.transient_failure() {
                    return EpisodeEnd::FailureStreak;
                }
                continue;
            }

            let encoded = match self.codec.encode(&frame) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(error = %e, "Frame encoding failed, skipping");
                    if self.transient_failure() {
                        return EpisodeEnd::FailureStreak;
                    }
                    continue;
                }
            };

            // Fire-and-forget: the transport's best-effort semantics apply.
            self.publisher.publish(encoded);
            self.state.record_delivery();

            if let Some(event) = self.presence.try_recv() {
                tracing::debug!(?event, "Presence event while streaming");
                return EpisodeEnd::ConsumerDeparted;
            }

            tokio::time::sleep(self.config.frame_interval).await;
        }
    }

    /// Record a transient failure; true when the streak ends the episode
    fn transient_failure(&mut self) -> bool {
        let streak = self.state.record_transient_failure();
        streak >= self.config.max_consecutive_failures
    }
}
