//! Wavedeck Catalog - collaborators behind the playback core
//!
//! The playback core never searches or persists user data itself. This crate
//! holds the pieces that sit on that boundary:
//!
//! - [`CachedResolver`]: LRU + TTL cache in front of any [`TrackResolver`]
//! - [`MemoryLibrary`]: in-memory likes and playlists ([`LibraryStore`])
//!
//! # Example
//!
//! ```
//! use async_trait::async_trait;
//! use wavedeck_catalog::CachedResolver;
//! use wavedeck_core::{Result, Track, TrackResolver};
//!
//! struct Fixed;
//!
//! #[async_trait]
//! impl TrackResolver for Fixed {
//!     async fn resolve_track(&self, identifier: &str) -> Result<Track> {
//!         Ok(Track::remote(identifier, "Song", "Artist", identifier))
//!     }
//! }
//!
//! # async fn run() -> wavedeck_catalog::Result<()> {
//! let resolver = CachedResolver::new(Fixed);
//! let track = resolver.resolve("dQw4w9WgXcQ").await?;
//! assert_eq!(resolver.len(), 1);
//! # let _ = track;
//! # Ok(())
//! # }
//! ```
//!
//! [`TrackResolver`]: wavedeck_core::TrackResolver
//! [`LibraryStore`]: wavedeck_core::LibraryStore

mod error;
mod library;
mod resolver;

// Re-export public API
pub use error::{CatalogError, Result};
pub use library::{MemoryLibrary, Playlist};
pub use resolver::{CachedResolver, DEFAULT_CAPACITY, DEFAULT_TTL};
