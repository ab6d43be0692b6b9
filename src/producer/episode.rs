//! Connection-episode state machine
//!
//! Tracks the producer's session state for one consumer-attachment period.
//! Two phases: `Idle` (no camera held, waiting for a presence event) and
//! `Streaming` (camera held, capturing and publishing). Invariant: the
//! capture device is held if and only if the phase is `Streaming`, and at
//! most one episode is active at a time. Presence is aggregate (a single
//! logical consumer group, not per-consumer tracking), so any presence
//! activity while streaming ends the episode.

/// Episode lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePhase {
    /// No camera held, blocked waiting for a presence event
    Idle,
    /// Camera held, actively capturing and publishing
    Streaming,
}

/// Producer session state across connection episodes
#[derive(Debug)]
pub struct EpisodeState {
    phase: EpisodePhase,
    consecutive_failures: u32,
    episodes_started: u64,
}

impl EpisodeState {
    /// Create a new state machine in `Idle`
    pub fn new() -> Self {
        Self {
            phase: EpisodePhase::Idle,
            consecutive_failures: 0,
            episodes_started: 0,
        }
    }

    /// Current phase
    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    /// Whether an episode is active (device held)
    pub fn is_streaming(&self) -> bool {
        self.phase == EpisodePhase::Streaming
    }

    /// Enter `Streaming` after the device opened successfully
    ///
    /// A no-op while already streaming, so duplicate triggers can never
    /// double-acquire.
    pub fn begin_episode(&mut self) {
        if self.phase == EpisodePhase::Idle {
            self.phase = EpisodePhase::Streaming;
            self.consecutive_failures = 0;
            self.episodes_started += 1;
        }
    }

    /// Return to `Idle`; the device must already be released
    pub fn end_episode(&mut self) {
        if self.phase == EpisodePhase::Streaming {
            self.phase = EpisodePhase::Idle;
            self.consecutive_failures = 0;
        }
    }

    /// Record a transient capture/encode failure; returns the streak length
    pub fn record_transient_failure(&mut self) -> u32 {
        self.consecutive_failures += 1;
        self.consecutive_failures
    }

    /// Record a successfully published frame, resetting the failure streak
    pub fn record_delivery(&mut self) {
        self.consecutive_failures = 0;
    }

    /// Current transient-failure streak
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Total episodes started since process start
    pub fn episodes_started(&self) -> u64 {
        self.episodes_started
    }
}

impl Default for EpisodeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_idle() {
        let state = EpisodeState::new();

        assert_eq!(state.phase(), EpisodePhase::Idle);
        assert!(!state.is_streaming());
        assert_eq!(state.episodes_started(), 0);
    }

    #[test]
    fn test_episode_lifecycle() {
        let mut state = EpisodeState::new();

        state.begin_episode();
        assert!(state.is_streaming());
        assert_eq!(state.episodes_started(), 1);

        state.end_episode();
        assert_eq!(state.phase(), EpisodePhase::Idle);
    }

    #[test]
    fn test_duplicate_begin_starts_one_episode() {
        let mut state = EpisodeState::new();

        state.begin_episode();
        state.begin_episode();

        assert!(state.is_streaming());
        assert_eq!(state.episodes_started(), 1);
    }

    #[test]
    fn test_end_while_idle_is_noop() {
        let mut state = EpisodeState::new();

        state.end_episode();
        assert_eq!(state.phase(), EpisodePhase::Idle);
        assert_eq!(state.episodes_started(), 0);
    }

    #[test]
    fn test_failure_streak_resets_on_delivery() {
        let mut state = EpisodeState::new();
        state.begin_episode();

        assert_eq!(state.record_transient_failure(), 1);
        assert_eq!(state.record_transient_failure(), 2);

        state.record_delivery();
        assert_eq!(state.consecutive_failures(), 0);
        assert_eq!(state.record_transient_failure(), 1);
    }

    #[test]
    fn test_failure_streak_resets_across_episodes() {
        let mut state = EpisodeState::new();

        state.begin_episode();
        state.record_transient_failure();
        state.end_episode();

        state.begin_episode();
        assert_eq!(state.consecutive_failures(), 0);
        assert_eq!(state.episodes_started(), 2);
    }
}
