//! Progress polling gate
//!
//! The host owns the actual timer and calls `PlaybackManager::poll_progress`
//! roughly once per interval. The poller decides whether a tick should reach
//! the driver: it is armed for exactly one generation while that load is
//! playing, and disarmed the moment the intent becomes pause or the track
//! changes.

use crate::driver::Generation;
use std::time::Duration;

/// Arming state for progress polling
#[derive(Debug, Clone)]
pub struct ProgressPoller {
    interval: Duration,
    armed: Option<Generation>,
}

impl ProgressPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            armed: None,
        }
    }

    /// Start polling for `generation`, replacing any previous arming
    pub fn arm(&mut self, generation: Generation) {
        self.armed = Some(generation);
    }

    /// Stop polling
    pub fn disarm(&mut self) {
        self.armed = None;
    }

    /// Whether a tick for the live `generation` should query the driver
    pub fn should_poll(&self, generation: Generation) -> bool {
        self.armed == Some(generation)
    }

    pub fn armed_for(&self) -> Option<Generation> {
        self.armed
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Interval the host timer should use
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for ProgressPoller {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
