//! Producer configuration

use std::time::Duration;

use crate::transport::TransportConfig;

/// Default pacing delay between captures
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(30);

/// Default transient-failure streak that forces a camera release
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 30;

/// Producer configuration options
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Capture device to open
    pub device_id: u32,

    /// Fixed pacing delay between capture iterations
    ///
    /// There is no backpressure from consumers; frames are published at
    /// this cadence regardless of consumption rate.
    pub frame_interval: Duration,

    /// Consecutive transient failures (empty frame, encode error) that end
    /// the episode and release the camera, bounding how long the device
    /// stays claimed through a dead capture pipeline
    pub max_consecutive_failures: u32,

    /// Transport channel configuration
    pub transport: TransportConfig,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
            transport: TransportConfig::default(),
        }
    }
}

impl ProducerConfig {
    /// Set the capture device ID
    pub fn device_id(mut self, id: u32) -> Self {
        self.device_id = id;
        self
    }

    /// Set the pacing delay between captures
    pub fn frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Set the failure streak that forces a release (minimum 1)
    pub fn max_consecutive_failures(mut self, max: u32) -> Self {
        self.max_consecutive_failures = max.max(1);
        self
    }

    /// Set the transport configuration
    pub fn transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }
}
