//! Recently played history in `localStorage`

use super::driver::js_message;
use crate::error::{PlaybackError, Result};
use crate::history::{self, HistoryStore};
use wavedeck_core::Track;
use web_sys::Storage;

/// Default storage key
pub const DEFAULT_KEY: &str = "wavedeck:recently-played";

/// [`HistoryStore`] backed by the page's `localStorage`
#[derive(Debug, Clone)]
pub struct LocalStorageHistory {
    key: String,
}

impl LocalStorageHistory {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<Storage> {
        let window = web_sys::window()
            .ok_or_else(|| PlaybackError::Persistence("no window".to_string()))?;
        window
            .local_storage()
            .map_err(|err| PlaybackError::Persistence(js_message(&err)))?
            .ok_or_else(|| PlaybackError::Persistence("localStorage unavailable".to_string()))
    }
}

impl Default for LocalStorageHistory {
    fn default() -> Self {
        Self::new(DEFAULT_KEY)
    }
}

impl HistoryStore for LocalStorageHistory {
    fn load(&self) -> Result<Vec<Track>> {
        let raw = Self::storage()?
            .get_item(&self.key)
            .map_err(|err| PlaybackError::Persistence(js_message(&err)))?;

        match raw {
            Some(raw) => history::decode(&raw),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, tracks: &[Track]) -> Result<()> {
        let raw = history::encode(tracks)?;
        Self::storage()?
            .set_item(&self.key, &raw)
            .map_err(|err| PlaybackError::Persistence(js_message(&err)))
    }
}
