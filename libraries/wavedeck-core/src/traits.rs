/// Collaborator traits for Wavedeck
///
/// The playback core never talks to the network or to the remote data store
/// itself. These traits mark the boundary to those collaborators.
use crate::error::Result;
use crate::types::Track;
use async_trait::async_trait;

/// Search/metadata collaborator
///
/// Turns an external identifier (e.g. a video id from a search result) into a
/// playable [`Track`]. Implementations are usually backed by an HTTP API and
/// are expected to be wrapped in a cache by the caller.
#[async_trait]
pub trait TrackResolver: Send + Sync {
    /// Resolve a single identifier into a track
    ///
    /// # Errors
    /// Returns an error if the lookup fails. Callers abandon the entry; they
    /// never substitute a placeholder track.
    async fn resolve_track(&self, identifier: &str) -> Result<Track>;
}

/// Persistence collaborator for user data (likes, playlists)
///
/// Invoked by UI layers. The playback core only reads `is_liked` style
/// booleans and never gates playback on them.
pub trait LibraryStore {
    /// Toggle the liked state of a track
    ///
    /// Returns the new liked state.
    ///
    /// # Errors
    /// Returns `WavedeckError::NotAuthenticated` when no user is signed in.
    fn toggle_like(&mut self, track: &Track) -> Result<bool>;

    /// Append a track to a playlist
    ///
    /// # Errors
    /// Returns an error if the playlist does not exist or already holds the track.
    fn add_to_playlist(&mut self, playlist_id: &str, track: &Track) -> Result<()>;

    /// Check whether a track is liked
    fn is_liked(&self, track_id: &str) -> bool;
}
