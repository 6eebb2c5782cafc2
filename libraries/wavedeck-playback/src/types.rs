//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::time::Duration;
use wavedeck_core::RepeatMode;

/// Transport phase
///
/// `Ended` is transient: the orchestrator resolves it through the repeat
/// policy within the same callback that observed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackPhase {
    /// No current track
    #[default]
    Idle,

    /// Current track set, driver not ready yet
    Loading,

    /// Driver ready and playing
    Playing,

    /// Driver ready and paused
    Paused,

    /// Driver reported the end of the track
    Ended,
}

/// Queue navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Page visibility as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

/// Configuration for playback manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Maximum recently-played size (default: 50)
    pub history_size: usize,

    /// Initial volume (0.0-1.0, default: 0.7)
    pub volume: f32,

    /// Initial repeat mode (default: none)
    pub repeat: RepeatMode,

    /// Start with shuffle on (default: false)
    pub shuffle: bool,

    /// Elapsed seconds after which "previous" restarts the track (default: 3)
    pub restart_threshold_secs: f64,

    /// Progress polling interval while playing (default: 1000 ms)
    pub poll_interval_ms: u64,
}

impl PlaybackConfig {
    /// "Previous" restart threshold
    pub fn restart_threshold(&self) -> Duration {
        Duration::try_from_secs_f64(self.restart_threshold_secs).unwrap_or(Duration::ZERO)
    }

    /// Progress polling interval
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            history_size: 50,
            volume: 0.7,
            repeat: RepeatMode::Off,
            shuffle: false,
            restart_threshold_secs: 3.0,
            poll_interval_ms: 1000,
        }
    }
}
