//! Recently played history
//!
//! A bounded, newest-first list of track snapshots, de-duplicated by id. It is
//! the only piece of playback state that outlives a session, through a
//! [`HistoryStore`].

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use wavedeck_core::Track;

/// Persisted layout version
const FORMAT_VERSION: u32 = 1;

/// Recently played tracks, newest first
#[derive(Debug, Clone)]
pub struct RecentlyPlayed {
    /// History buffer (most recent = front)
    tracks: VecDeque<Track>,

    /// Maximum history size
    max_size: usize,
}

impl RecentlyPlayed {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            tracks: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Rebuild from persisted tracks (newest first)
    ///
    /// Duplicates keep their newest entry and the list is cut to `max_size`.
    pub fn from_tracks(tracks: Vec<Track>, max_size: usize) -> Self {
        let mut history = Self::new(max_size);
        for track in tracks.into_iter().rev() {
            history.record(track);
        }
        history
    }

    /// Record a play
    ///
    /// Moves an existing entry with the same id to the front instead of
    /// duplicating it. If history is full, oldest track is discarded.
    pub fn record(&mut self, track: Track) {
        self.tracks.retain(|t| t.id != track.id);
        self.tracks.push_front(track);
        self.tracks.truncate(self.max_size);
    }

    /// Most recent track
    pub fn latest(&self) -> Option<&Track> {
        self.tracks.front()
    }

    /// All tracks (newest first)
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Owned copy for persistence or snapshots
    pub fn to_vec(&self) -> Vec<Track> {
        self.tracks.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for RecentlyPlayed {
    fn default() -> Self {
        Self::new(50) // Default: 50 tracks
    }
}

/// Durable storage for the recently played list
pub trait HistoryStore {
    /// Load tracks, newest first. Missing storage loads as empty.
    fn load(&self) -> Result<Vec<Track>>;

    /// Replace the stored tracks
    fn save(&mut self, tracks: &[Track]) -> Result<()>;
}

#[derive(Serialize)]
struct HistoryFileRef<'a> {
    version: u32,
    tracks: &'a [Track],
}

#[derive(Deserialize)]
struct HistoryFile {
    version: u32,
    #[serde(default)]
    tracks: Vec<Track>,
}

/// Serialize tracks into the persisted layout
pub fn encode(tracks: &[Track]) -> Result<String> {
    let file = HistoryFileRef {
        version: FORMAT_VERSION,
        tracks,
    };
    Ok(serde_json::to_string(&file)?)
}

/// Parse the persisted layout
pub fn decode(raw: &str) -> Result<Vec<Track>> {
    let file: HistoryFile = serde_json::from_str(raw)?;
    if file.version != FORMAT_VERSION {
        return Err(PlaybackError::Persistence(format!(
            "unsupported history version {}",
            file.version
        )));
    }
    Ok(file.tracks)
}

/// History stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self) -> Result<Vec<Track>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        decode(&raw)
    }

    fn save(&mut self, tracks: &[Track]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write then rename so a crash never leaves a truncated file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, encode(tracks)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory store; clones share the same list
#[derive(Debug, Clone, Default)]
pub struct MemoryHistoryStore {
    tracks: Arc<Mutex<Vec<Track>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with tracks
    pub fn with_tracks(tracks: Vec<Track>) -> Self {
        Self {
            tracks: Arc::new(Mutex::new(tracks)),
        }
    }

    /// Current contents
    pub fn snapshot(&self) -> Vec<Track> {
        self.tracks.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Result<Vec<Track>> {
        self.tracks
            .lock()
            .map(|t| t.clone())
            .map_err(|_| PlaybackError::Persistence("history lock poisoned".to_string()))
    }

    fn save(&mut self, tracks: &[Track]) -> Result<()> {
        let mut stored = self
            .tracks
            .lock()
            .map_err(|_| PlaybackError::Persistence("history lock poisoned".to_string()))?;
        *stored = tracks.to_vec();
        Ok(())
    }
}
