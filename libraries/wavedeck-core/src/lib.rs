//! Wavedeck Core
//!
//! Platform-agnostic core types, traits, and error handling for Wavedeck.
//!
//! This crate provides the foundational building blocks shared by the playback
//! core, the catalog collaborators, and every host (browser or headless).
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackKind`, `RepeatMode`
//! - **Collaborator Traits**: `TrackResolver` (search/metadata), `LibraryStore` (likes, playlists)
//! - **Error Handling**: Unified `WavedeckError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use wavedeck_core::{Track, TrackKind};
//! use std::time::Duration;
//!
//! // A track backed by a remote video identifier
//! let remote = Track::remote("yt-1", "Song", "Artist", "dQw4w9WgXcQ")
//!     .with_duration(Duration::from_secs(212));
//!
//! // A track backed by a local audio file, length discovered on load
//! let local = Track::local("local-1", "Sample Song 1", "Local Artist", "/music/sample1.mp3");
//!
//! assert!(matches!(remote.kind, TrackKind::Remote { .. }));
//! assert_eq!(local.known_duration(), None);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, WavedeckError};
pub use traits::{LibraryStore, TrackResolver};
pub use types::{RepeatMode, Track, TrackKind};
