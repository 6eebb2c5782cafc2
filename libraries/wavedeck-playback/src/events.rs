//! Playback Events
//!
//! Event-based communication for UI synchronization during playback.
//! Events are queued by the manager and drained by the host:
//! - Phase and intent changes (loading/playing/paused/ended)
//! - Track changes (immediately on every track-change protocol run)
//! - Position and duration updates
//! - Queue, shuffle, repeat and volume changes
//! - Transient load/playback errors

use crate::types::PlaybackPhase;
use serde::{Deserialize, Serialize};
use wavedeck_core::RepeatMode;

/// Events emitted by the playback system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PlaybackEvent {
    /// Transport phase or play intent changed
    StateChanged {
        /// The new phase
        phase: PlaybackPhase,
        /// User intent
        is_playing: bool,
    },

    /// Current track changed
    TrackChanged {
        /// ID of the new (current) track
        track_id: String,
        /// ID of the previous track (if any)
        previous_track_id: Option<String>,
    },

    /// Track finished playing naturally (reached end)
    TrackFinished {
        /// ID of the finished track
        track_id: String,
    },

    /// Position update (periodic, typically every 1s)
    PositionUpdate {
        /// Current playback position
        position_ms: u64,
        /// Total track duration (0 while unknown)
        duration_ms: u64,
    },

    /// Driver reported the track length
    DurationChanged {
        duration_ms: u64,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0.0-1.0)
        level: f32,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Queue changed (tracks added/removed/replaced)
    QueueChanged {
        /// New queue length
        length: usize,
    },

    ShuffleChanged {
        is_shuffled: bool,
    },

    RepeatChanged {
        mode: RepeatMode,
    },

    /// Load or playback failed
    ///
    /// Transient notification: the transport is already back in `Paused`.
    Error {
        /// Track that failed, if any
        track_id: Option<String>,
        /// Error message
        message: String,
    },
}

impl PlaybackEvent {
    /// Whether the event is a user-visible failure
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_camel_case_json() {
        let event = PlaybackEvent::TrackChanged {
            track_id: "b".to_string(),
            previous_track_id: Some("a".to_string()),
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "trackChanged");
        assert_eq!(json["trackId"], "b");
        assert_eq!(json["previousTrackId"], "a");
    }

    #[test]
    fn state_changed_json() {
        let event = PlaybackEvent::StateChanged {
            phase: PlaybackPhase::Paused,
            is_playing: false,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["phase"], "paused");
        assert_eq!(json["isPlaying"], false);
    }

    #[test]
    fn repeat_changed_uses_wire_names() {
        let event = PlaybackEvent::RepeatChanged {
            mode: RepeatMode::Off,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["mode"], "none");
    }

    #[test]
    fn error_detection() {
        let error = PlaybackEvent::Error {
            track_id: None,
            message: "network".to_string(),
        };
        assert!(error.is_error());
        assert!(!PlaybackEvent::QueueChanged { length: 1 }.is_error());
    }
}
