use crate::error::{CatalogError, Result};
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use wavedeck_core::{Track, TrackResolver};

/// Default number of cached tracks
pub const DEFAULT_CAPACITY: usize = 256;

/// Default freshness window (1 hour)
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

const DEFAULT_CAPACITY_NZ: NonZeroUsize = match NonZeroUsize::new(DEFAULT_CAPACITY) {
    Some(capacity) => capacity,
    None => panic!("default capacity must be non-zero"),
};

struct CachedTrack {
    track: Track,
    fetched_at: Instant,
}

/// Caching wrapper around a [`TrackResolver`]
///
/// Entries are evicted least-recently-used once the cache is full and are
/// refetched once they are older than the TTL. Failed lookups are never cached.
pub struct CachedResolver<R> {
    inner: R,
    cache: Mutex<LruCache<String, CachedTrack>>,
    ttl: Duration,
}

impl<R: TrackResolver> CachedResolver<R> {
    /// Wrap `inner` with the default capacity and TTL
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(DEFAULT_CAPACITY_NZ)),
            ttl: DEFAULT_TTL,
        }
    }

    /// Wrap `inner` with a cache holding at most `capacity` tracks
    pub fn with_capacity(inner: R, capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or(CatalogError::InvalidCapacity(capacity))?;
        Ok(Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
            ttl: DEFAULT_TTL,
        })
    }

    /// Override the freshness window
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Resolve `identifier`, serving fresh cache entries without a lookup
    pub async fn resolve(&self, identifier: &str) -> Result<Track> {
        if let Some(track) = self.cached(identifier) {
            debug!(identifier, "Track cache hit");
            return Ok(track);
        }

        let track = self.inner.resolve_track(identifier).await?;
        self.lock().put(
            identifier.to_string(),
            CachedTrack {
                track: track.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(track)
    }

    /// Resolve a batch, keeping input order
    ///
    /// Identifiers that fail to resolve are logged and left out; no
    /// placeholder is substituted.
    pub async fn resolve_all<S>(&self, identifiers: &[S]) -> Vec<Track>
    where
        S: AsRef<str> + Sync,
    {
        let mut tracks = Vec::with_capacity(identifiers.len());
        for identifier in identifiers {
            let identifier = identifier.as_ref();
            match self.resolve(identifier).await {
                Ok(track) => tracks.push(track),
                Err(err) => warn!(identifier, error = %err, "Dropping unresolved track"),
            }
        }
        tracks
    }

    /// Drop one entry; returns whether it was cached
    pub fn invalidate(&self, identifier: &str) -> bool {
        self.lock().pop(identifier).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of cached entries, fresh or not
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    fn cached(&self, identifier: &str) -> Option<Track> {
        let mut cache = self.lock();
        let fresh = cache
            .get(identifier)
            .map(|entry| entry.fetched_at.elapsed() < self.ttl)?;

        if fresh {
            cache.get(identifier).map(|entry| entry.track.clone())
        } else {
            debug!(identifier, "Track cache entry expired");
            cache.pop(identifier);
            None
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, CachedTrack>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<R: TrackResolver> TrackResolver for CachedResolver<R> {
    async fn resolve_track(&self, identifier: &str) -> wavedeck_core::Result<Track> {
        Ok(self.resolve(identifier).await?)
    }
}
