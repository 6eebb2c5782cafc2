//! Backend driver abstraction
//!
//! Two backends exist per session: the embedded remote video player and the
//! local audio element. Both sit behind [`PlaybackDriver`] so the
//! orchestrator's track-change protocol never cares which one is active.
//!
//! Every load is tagged with a [`Generation`]. Drivers echo that generation
//! on every [`DriverEvent`] they emit for the load, and the orchestrator drops
//! events whose generation is no longer current.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use wavedeck_core::types::duration_secs;
use wavedeck_core::TrackKind;

/// Which backend a driver wraps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// Embedded remote video player
    Remote,

    /// Local audio element
    Local,
}

impl DriverKind {
    /// Driver responsible for a track kind
    pub fn for_track(kind: &TrackKind) -> Self {
        match kind {
            TrackKind::Remote { .. } => Self::Remote,
            TrackKind::Local { .. } => Self::Local,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Load generation
///
/// Incremented on every track change. Zero means "nothing loaded yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(pub u64);

impl Generation {
    /// Generation following this one
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Answer to a current-time query
///
/// The local audio element answers synchronously. The remote player needs a
/// round trip: it answers `Pending` and later emits
/// [`DriverEventKind::TimeUpdate`] tagged with the generation it was asked
/// under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeQuery {
    /// Position known now
    Ready(Duration),

    /// Position will arrive as a `TimeUpdate` event
    Pending,
}

/// Event emitted by a backend for one load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverEvent {
    /// Generation the load was issued under
    pub generation: Generation,

    /// What happened
    pub kind: DriverEventKind,
}

impl DriverEvent {
    pub fn new(generation: Generation, kind: DriverEventKind) -> Self {
        Self { generation, kind }
    }
}

/// Backend event payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum DriverEventKind {
    /// Backend can start playing
    Ready,

    /// Backend discovered the track length
    MetadataLoaded(#[serde(with = "duration_secs")] Duration),

    /// Playback position report (periodic or answer to a pending query)
    TimeUpdate(#[serde(with = "duration_secs")] Duration),

    /// A seek command completed
    Seeked,

    /// Track played to the end
    Ended,

    /// Resource could not be loaded or played
    Error(String),
}

/// Adapter around a concrete playback backend
///
/// Commands are fire-and-forget: results are observed later through
/// [`DriverEvent`]s. An `Err` means the command could not even be issued,
/// which the orchestrator treats the same as an `Error` event.
pub trait PlaybackDriver {
    /// Backend this driver wraps
    fn kind(&self) -> DriverKind;

    /// Start loading a resource (video id or audio URL)
    ///
    /// Events for this load must carry `generation`. Loading implicitly
    /// abandons whatever the driver had loaded before.
    fn load(&mut self, resource: &str, generation: Generation) -> Result<()>;

    /// Start or resume playback
    fn play(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self) -> Result<()>;

    /// Stop playback and release resources tied to the current load
    fn stop(&mut self) -> Result<()>;

    /// Seek to a position
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Apply an output level (0.0-1.0)
    fn set_volume(&mut self, level: f32) -> Result<()>;

    /// Query the current position
    fn current_time(&mut self, generation: Generation) -> TimeQuery;

    /// Release the backend at session end
    fn shutdown(&mut self) {
        let _ = self.stop();
    }
}

/// The two backend singletons of a session
pub struct Drivers {
    remote: Box<dyn PlaybackDriver>,
    local: Box<dyn PlaybackDriver>,
}

impl Drivers {
    /// Wrap the remote and local drivers
    pub fn new(remote: Box<dyn PlaybackDriver>, local: Box<dyn PlaybackDriver>) -> Self {
        Self { remote, local }
    }

    /// Driver for a backend kind
    pub fn get_mut(&mut self, kind: DriverKind) -> &mut dyn PlaybackDriver {
        match kind {
            DriverKind::Remote => self.remote.as_mut(),
            DriverKind::Local => self.local.as_mut(),
        }
    }

    /// Shut both backends down
    pub fn shutdown(&mut self) {
        self.remote.shutdown();
        self.local.shutdown();
    }
}

impl fmt::Debug for Drivers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Drivers")
            .field("remote", &self.remote.kind())
            .field("local", &self.local.kind())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_track_kind() {
        let remote = TrackKind::Remote {
            video_id: "abc".to_string(),
        };
        let local = TrackKind::Local {
            audio_url: "/a.mp3".to_string(),
        };
        assert_eq!(DriverKind::for_track(&remote), DriverKind::Remote);
        assert_eq!(DriverKind::for_track(&local), DriverKind::Local);
    }

    #[test]
    fn generation_increments() {
        let gen = Generation::default();
        assert_eq!(gen, Generation(0));
        assert_eq!(gen.next(), Generation(1));
        assert!(gen.next() > gen);
    }

    #[test]
    fn event_json_shape() {
        let event = DriverEvent::new(
            Generation(3),
            DriverEventKind::MetadataLoaded(Duration::from_millis(1500)),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["generation"], 3);
        assert_eq!(json["kind"]["type"], "metadataLoaded");
        assert_eq!(json["kind"]["value"], 1.5);

        let parsed: DriverEvent =
            serde_json::from_str(r#"{"generation":1,"kind":{"type":"ended"}}"#).unwrap();
        assert_eq!(parsed.kind, DriverEventKind::Ended);
    }

    #[test]
    fn negative_time_update_reads_as_zero() {
        let parsed: DriverEvent = serde_json::from_str(
            r#"{"generation":2,"kind":{"type":"timeUpdate","value":-0.25}}"#,
        )
        .unwrap();
        assert_eq!(parsed.kind, DriverEventKind::TimeUpdate(Duration::ZERO));
    }
}
