//! Wavedeck - Playback Core
//!
//! Platform-agnostic queue and transport orchestration for Wavedeck.
//!
//! This crate provides:
//! - Playback queue with pinned Fisher-Yates shuffle and exact unshuffle
//! - Transport state machine (idle, loading, playing, paused, ended)
//! - Repeat modes (none, all, one) and auto-advance on track end
//! - Backend driver abstraction with generation-tagged events
//! - Volume with mute
//! - Recently played history (configurable size, persisted)
//! - Observable snapshots and drainable events for UI synchronization
//!
//! # Architecture
//!
//! `wavedeck-playback` knows nothing about the browser:
//! - Backends (embedded video player, audio element) are [`PlaybackDriver`]s
//! - Timers are owned by the host, which calls
//!   [`PlaybackManager::poll_progress`]
//! - Backend callbacks come back in through
//!   [`PlaybackManager::handle_driver_event`]
//!
//! The `wasm` feature adds bindings that wire all three to JavaScript.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use std::time::Duration;
//! use wavedeck_core::Track;
//! use wavedeck_playback::{
//!     DriverEvent, DriverEventKind, DriverKind, Generation, PlaybackConfig, PlaybackDriver,
//!     PlaybackManager, Result, TimeQuery,
//! };
//!
//! // A backend that does nothing
//! struct Silent(DriverKind);
//!
//! impl PlaybackDriver for Silent {
//!     fn kind(&self) -> DriverKind { self.0 }
//!     fn load(&mut self, _resource: &str, _generation: Generation) -> Result<()> { Ok(()) }
//!     fn play(&mut self) -> Result<()> { Ok(()) }
//!     fn pause(&mut self) -> Result<()> { Ok(()) }
//!     fn stop(&mut self) -> Result<()> { Ok(()) }
//!     fn seek(&mut self, _position: Duration) -> Result<()> { Ok(()) }
//!     fn set_volume(&mut self, _level: f32) -> Result<()> { Ok(()) }
//!     fn current_time(&mut self, _generation: Generation) -> TimeQuery {
//!         TimeQuery::Ready(Duration::ZERO)
//!     }
//! }
//!
//! let mut manager = PlaybackManager::new(
//!     PlaybackConfig::default(),
//!     Box::new(Silent(DriverKind::Remote)),
//!     Box::new(Silent(DriverKind::Local)),
//! );
//!
//! let tracks = vec![
//!     Track::remote("a", "First", "Artist", "dQw4w9WgXcQ"),
//!     Track::local("b", "Second", "Artist", "/music/second.mp3"),
//! ];
//! manager.play_context(tracks, 0)?;
//!
//! // The remote backend reports the end of "a"
//! let generation = manager.generation();
//! manager.handle_driver_event(DriverEvent::new(generation, DriverEventKind::Ended));
//! assert_eq!(manager.current_track().map(|t| t.id.as_str()), Some("b"));
//! # Ok::<(), wavedeck_playback::PlaybackError>(())
//! ```
//!
//! # Example: Shuffle and Repeat
//!
//! ```rust
//! use wavedeck_core::{RepeatMode, Track};
//! use wavedeck_playback::Queue;
//!
//! let mut queue = Queue::new();
//! for id in ["a", "b", "c", "d"] {
//!     queue.enqueue(Track::local(id, id, "Artist", format!("/music/{id}.mp3")));
//! }
//! let current = queue.items()[1].clone();
//! queue.set_current(&current);
//!
//! queue.shuffle();
//! assert_eq!(queue.items()[1].id, "b"); // current track keeps its index
//!
//! queue.unshuffle();
//! let order: Vec<_> = queue.items().iter().map(|t| t.id.as_str()).collect();
//! assert_eq!(order, ["a", "b", "c", "d"]);
//!
//! assert_eq!(RepeatMode::Off.cycle(), RepeatMode::All);
//! ```

pub mod driver;
mod error;
pub mod events;
pub mod history;
mod manager;
mod poller;
mod queue;
mod shuffle;
pub mod store;
mod transport;
pub mod types;
mod volume;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use driver::{DriverEvent, DriverEventKind, DriverKind, Drivers, Generation, PlaybackDriver, TimeQuery};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use history::{HistoryStore, JsonHistoryStore, MemoryHistoryStore, RecentlyPlayed};
pub use manager::PlaybackManager;
pub use poller::ProgressPoller;
pub use queue::Queue;
pub use shuffle::shuffle_pinned;
pub use store::{PlaybackSnapshot, StateStore, SubscriptionId};
pub use transport::Transport;
pub use types::{Direction, PlaybackConfig, PlaybackPhase, Visibility};
pub use volume::Volume;

#[cfg(feature = "wasm")]
pub use wasm::WasmPlaybackManager;
