/// Queue files: a JSON array of tracks
use crate::error::{AppError, Result};
use std::path::Path;
use wavedeck_core::Track;

/// Read a queue file
///
/// Tracks use the same JSON shape the browser UI stores, e.g.
/// `{"id":"a","title":"Song","artist":"Band","kind":"remote","videoId":"x","duration":212}`.
pub fn load_queue(path: &Path) -> Result<Vec<Track>> {
    let raw = std::fs::read_to_string(path)?;
    parse_queue(&raw)
}

pub fn parse_queue(raw: &str) -> Result<Vec<Track>> {
    let tracks: Vec<Track> = serde_json::from_str(raw)?;
    if tracks.is_empty() {
        return Err(AppError::InvalidQueue("queue holds no tracks".to_string()));
    }
    Ok(tracks)
}
