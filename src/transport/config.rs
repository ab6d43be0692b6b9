//! Transport configuration

use std::net::SocketAddr;

/// Default frame-channel port
pub const DEFAULT_FRAME_PORT: u16 = 5555;

/// Default presence-channel port
pub const DEFAULT_PRESENCE_PORT: u16 = 5556;

/// Default per-subscriber outgoing queue depth (frames)
pub const DEFAULT_QUEUE_DEPTH: usize = 32;

/// Transport configuration options
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Address the frame channel binds to
    pub frame_addr: SocketAddr,

    /// Address the presence channel binds to
    pub presence_addr: SocketAddr,

    /// Outgoing queue depth per subscriber
    ///
    /// When a subscriber falls this many frames behind, the oldest queued
    /// frames are dropped so the producer never blocks on a slow consumer.
    pub queue_depth: usize,

    /// Enable TCP_NODELAY (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            frame_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_FRAME_PORT)),
            presence_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PRESENCE_PORT)),
            queue_depth: DEFAULT_QUEUE_DEPTH,
            tcp_nodelay: true, // Important for low latency
        }
    }
}

impl TransportConfig {
    /// Set the frame-channel bind address
    pub fn frame_addr(mut self, addr: SocketAddr) -> Self {
        self.frame_addr = addr;
        self
    }

    /// Set the presence-channel bind address
    pub fn presence_addr(mut self, addr: SocketAddr) -> Self {
        self.presence_addr = addr;
        self
    }

    /// Set the per-subscriber queue depth (minimum 1)
    pub fn queue_depth(mut self, depth: usize) -> Self {
        self.queue_depth = depth.max(1);
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn tcp_nodelay(mut self, enabled: bool) -> Self {
        self.tcp_nodelay = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TransportConfig::default();

        assert_eq!(config.frame_addr.port(), DEFAULT_FRAME_PORT);
        assert_eq!(config.presence_addr.port(), DEFAULT_PRESENCE_PORT);
        assert_eq!(config.queue_depth, DEFAULT_QUEUE_DEPTH);
        assert!(config.tcp_nodelay);
    }

    #[test]
    fn test_builder_chaining() {
        let frame: SocketAddr = "127.0.0.1:7001".parse().unwrap();
        let presence: SocketAddr = "127.0.0.1:7002".parse().unwrap();

        let config = TransportConfig::default()
            .frame_addr(frame)
            .presence_addr(presence)
            .queue_depth(8)
            .tcp_nodelay(false);

        assert_eq!(config.frame_addr, frame);
        assert_eq!(config.presence_addr, presence);
        assert_eq!(config.queue_depth, 8);
        assert!(!config.tcp_nodelay);
    }

    #[test]
    fn test_queue_depth_floor() {
        let config = TransportConfig::default().queue_depth(0);

        assert_eq!(config.queue_depth, 1);
    }
}
