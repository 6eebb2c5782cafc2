//! Observable playback state
//!
//! UI layers subscribe to [`PlaybackSnapshot`]s instead of polling the
//! manager. A snapshot is published after every state change; identical
//! consecutive snapshots are delivered once.

use crate::types::PlaybackPhase;
use serde::{Deserialize, Serialize};
use std::fmt;
use wavedeck_core::{RepeatMode, Track};

/// Everything a UI renders from the playback core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub current_track: Option<Track>,
    pub is_playing: bool,
    /// Stored level (0.0-1.0), independent of mute
    pub volume: f32,
    pub is_muted: bool,
    /// Seconds elapsed
    pub progress: f64,
    /// Seconds, 0 while unknown
    pub duration: f64,
    pub queue: Vec<Track>,
    pub is_shuffled: bool,
    pub repeat_mode: RepeatMode,
    pub phase: PlaybackPhase,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            current_track: None,
            is_playing: false,
            volume: 0.7,
            is_muted: false,
            progress: 0.0,
            duration: 0.0,
            queue: Vec::new(),
            is_shuffled: false,
            repeat_mode: RepeatMode::Off,
            phase: PlaybackPhase::Idle,
        }
    }
}

/// Handle returned by [`StateStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&PlaybackSnapshot)>;

/// Publish/subscribe hub for snapshots
#[derive(Default)]
pub struct StateStore {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
    last: Option<PlaybackSnapshot>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    ///
    /// The listener immediately receives the last published snapshot, if any.
    pub fn subscribe<F>(&mut self, mut listener: F) -> SubscriptionId
    where
        F: FnMut(&PlaybackSnapshot) + 'static,
    {
        if let Some(last) = &self.last {
            listener(last);
        }

        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Deliver a snapshot to every listener
    ///
    /// Returns `false` when the snapshot equals the previous one.
    pub fn publish(&mut self, snapshot: PlaybackSnapshot) -> bool {
        if self.last.as_ref() == Some(&snapshot) {
            return false;
        }

        for (_, listener) in &mut self.listeners {
            listener(&snapshot);
        }
        self.last = Some(snapshot);
        true
    }

    /// Last published snapshot
    pub fn latest(&self) -> Option<&PlaybackSnapshot> {
        self.last.as_ref()
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for StateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateStore")
            .field("subscribers", &self.listeners.len())
            .field("last", &self.last)
            .finish()
    }
}
