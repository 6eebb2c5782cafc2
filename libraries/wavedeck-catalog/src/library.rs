use tracing::debug;
use wavedeck_core::{LibraryStore, Result, Track, WavedeckError};

/// User playlist
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub tracks: Vec<Track>,
    /// Artwork of the first track
    pub thumbnail: Option<String>,
}

impl Playlist {
    fn refresh_thumbnail(&mut self) {
        self.thumbnail = self.tracks.first().and_then(|t| t.thumbnail.clone());
    }
}

/// In-memory [`LibraryStore`]
///
/// Liked tracks and playlists are kept newest first. Every mutation requires a
/// signed-in user.
#[derive(Debug, Clone)]
pub struct MemoryLibrary {
    signed_in: bool,
    liked: Vec<Track>,
    playlists: Vec<Playlist>,
    next_playlist_id: u64,
}

impl MemoryLibrary {
    /// Library for a signed-in user
    pub fn new() -> Self {
        Self {
            signed_in: true,
            liked: Vec::new(),
            playlists: Vec::new(),
            next_playlist_id: 1,
        }
    }

    /// Library with nobody signed in
    pub fn signed_out() -> Self {
        Self {
            signed_in: false,
            ..Self::new()
        }
    }

    pub fn sign_in(&mut self) {
        self.signed_in = true;
    }

    pub fn sign_out(&mut self) {
        self.signed_in = false;
    }

    pub fn is_signed_in(&self) -> bool {
        self.signed_in
    }

    /// Liked tracks, newest first
    pub fn liked(&self) -> &[Track] {
        &self.liked
    }

    /// Playlists, newest first
    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn playlist(&self, playlist_id: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == playlist_id)
    }

    /// Create an empty playlist; returns its id
    pub fn create_playlist(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<String> {
        self.require_user()?;
        let name = name.into();
        if name.trim().is_empty() {
            return Err(WavedeckError::invalid_input("playlist name is empty"));
        }

        let id = format!("playlist-{}", self.next_playlist_id);
        self.next_playlist_id += 1;
        self.playlists.insert(
            0,
            Playlist {
                id: id.clone(),
                name,
                description,
                tracks: Vec::new(),
                thumbnail: None,
            },
        );
        debug!(playlist_id = %id, "Created playlist");
        Ok(id)
    }

    /// Remove a track from a playlist; returns whether it was there
    pub fn remove_from_playlist(&mut self, playlist_id: &str, track_id: &str) -> Result<bool> {
        self.require_user()?;
        let playlist = self.playlist_mut(playlist_id)?;

        let before = playlist.tracks.len();
        playlist.tracks.retain(|t| t.id != track_id);
        playlist.refresh_thumbnail();
        Ok(playlist.tracks.len() != before)
    }

    pub fn delete_playlist(&mut self, playlist_id: &str) -> Result<()> {
        self.require_user()?;
        let pos = self
            .playlists
            .iter()
            .position(|p| p.id == playlist_id)
            .ok_or_else(|| WavedeckError::PlaylistNotFound(playlist_id.to_string()))?;
        self.playlists.remove(pos);
        Ok(())
    }

    fn require_user(&self) -> Result<()> {
        if self.signed_in {
            Ok(())
        } else {
            Err(WavedeckError::NotAuthenticated)
        }
    }

    fn playlist_mut(&mut self, playlist_id: &str) -> Result<&mut Playlist> {
        self.playlists
            .iter_mut()
            .find(|p| p.id == playlist_id)
            .ok_or_else(|| WavedeckError::PlaylistNotFound(playlist_id.to_string()))
    }
}

impl Default for MemoryLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryStore for MemoryLibrary {
    fn toggle_like(&mut self, track: &Track) -> Result<bool> {
        self.require_user()?;

        if let Some(pos) = self.liked.iter().position(|t| t.id == track.id) {
            self.liked.remove(pos);
            Ok(false)
        } else {
            self.liked.insert(0, track.clone());
            Ok(true)
        }
    }

    fn add_to_playlist(&mut self, playlist_id: &str, track: &Track) -> Result<()> {
        self.require_user()?;
        let playlist = self.playlist_mut(playlist_id)?;

        if playlist.tracks.iter().any(|t| t.id == track.id) {
            return Err(WavedeckError::Duplicate(format!(
                "{} already in {}",
                track.id, playlist_id
            )));
        }

        playlist.tracks.push(track.clone());
        playlist.refresh_thumbnail();
        Ok(())
    }

    fn is_liked(&self, track_id: &str) -> bool {
        self.liked.iter().any(|t| t.id == track_id)
    }
}
