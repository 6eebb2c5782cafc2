//! Simulated playback backends
//!
//! Stand-ins for the browser's embedded video player and audio element. Each
//! backend keeps a clock that [`SimulatedBackend::advance`] moves forward and
//! reports back through a channel, the way the real players fire callbacks.

use crossbeam_channel::Sender;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use tracing::trace;
use wavedeck_core::Track;
use wavedeck_playback::{
    DriverEvent, DriverEventKind, DriverKind, Generation, PlaybackDriver, PlaybackError, Result,
    TimeQuery,
};

struct Loaded {
    generation: Generation,
    length: Duration,
    announced: bool,
}

#[derive(Default)]
struct BackendState {
    loaded: Option<Loaded>,
    playing: bool,
    position: Duration,
    volume: f32,
    /// Time query waiting for the next step (remote backend only)
    pending_query: Option<Generation>,
}

/// One simulated player
///
/// The remote flavour answers time queries on the next step; the local
/// flavour answers immediately. Unknown resources fail to load.
pub struct SimulatedBackend {
    kind: DriverKind,
    lengths: HashMap<String, Duration>,
    state: RefCell<BackendState>,
    events: Sender<DriverEvent>,
}

impl SimulatedBackend {
    /// Create a backend that can play every track in `library`
    ///
    /// Tracks without a known duration are given `unknown_length`, which the
    /// backend announces as metadata once loaded.
    pub fn new(
        kind: DriverKind,
        library: &[Track],
        unknown_length: Duration,
        events: Sender<DriverEvent>,
    ) -> Rc<Self> {
        let lengths = library
            .iter()
            .filter(|track| DriverKind::for_track(&track.kind) == kind)
            .map(|track| {
                let length = track.known_duration().unwrap_or(unknown_length);
                (track.resource().to_string(), length)
            })
            .collect();

        Rc::new(Self {
            kind,
            lengths,
            state: RefCell::new(BackendState::default()),
            events,
        })
    }

    pub fn kind(&self) -> DriverKind {
        self.kind
    }

    /// Move the clock forward by `step` and fire whatever callbacks are due
    pub fn advance(&self, step: Duration) {
        let mut state = self.state.borrow_mut();
        let BackendState {
            loaded,
            playing,
            position,
            pending_query,
            ..
        } = &mut *state;

        let Some(loaded) = loaded.as_mut() else {
            return;
        };
        let generation = loaded.generation;

        if !loaded.announced {
            loaded.announced = true;
            let kind = match self.kind {
                DriverKind::Remote => DriverEventKind::Ready,
                DriverKind::Local => DriverEventKind::MetadataLoaded(loaded.length),
            };
            self.send(generation, kind);
        }

        if *playing {
            *position = (*position + step).min(loaded.length);
            if *position >= loaded.length {
                *playing = false;
                self.send(generation, DriverEventKind::Ended);
            }
        }

        if let Some(query) = pending_query.take() {
            self.send(query, DriverEventKind::TimeUpdate(*position));
        }
    }

    /// Whether the backend is currently producing audio
    pub fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    pub fn volume(&self) -> f32 {
        self.state.borrow().volume
    }

    fn send(&self, generation: Generation, kind: DriverEventKind) {
        trace!(driver = %self.kind, generation = generation.0, event = ?kind, "Simulated callback");
        // The receiver only goes away when the session is over
        self.events.send(DriverEvent::new(generation, kind)).ok();
    }
}

/// [`PlaybackDriver`] handle onto a shared [`SimulatedBackend`]
pub struct SimulatedDriver {
    backend: Rc<SimulatedBackend>,
}

impl SimulatedDriver {
    pub fn new(backend: Rc<SimulatedBackend>) -> Self {
        Self { backend }
    }

    fn require_loaded(&self) -> Result<()> {
        if self.backend.state.borrow().loaded.is_some() {
            Ok(())
        } else {
            Err(PlaybackError::NoTrackLoaded)
        }
    }
}

impl PlaybackDriver for SimulatedDriver {
    fn kind(&self) -> DriverKind {
        self.backend.kind
    }

    fn load(&mut self, resource: &str, generation: Generation) -> Result<()> {
        let length = self.backend.lengths.get(resource).copied().ok_or_else(|| {
            PlaybackError::driver(self.backend.kind, format!("unknown resource {}", resource))
        })?;

        let mut state = self.backend.state.borrow_mut();
        state.loaded = Some(Loaded {
            generation,
            length,
            announced: false,
        });
        state.playing = false;
        state.position = Duration::ZERO;
        state.pending_query = None;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.require_loaded()?;
        self.backend.state.borrow_mut().playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.backend.state.borrow_mut().playing = false;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        let mut state = self.backend.state.borrow_mut();
        state.loaded = None;
        state.playing = false;
        state.position = Duration::ZERO;
        state.pending_query = None;
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        let generation = {
            let mut state = self.backend.state.borrow_mut();
            let Some(loaded) = state.loaded.as_ref() else {
                return Err(PlaybackError::NoTrackLoaded);
            };
            let generation = loaded.generation;
            state.position = position.min(loaded.length);
            generation
        };
        self.backend.send(generation, DriverEventKind::Seeked);
        Ok(())
    }

    fn set_volume(&mut self, level: f32) -> Result<()> {
        self.backend.state.borrow_mut().volume = level;
        Ok(())
    }

    fn current_time(&mut self, generation: Generation) -> TimeQuery {
        let mut state = self.backend.state.borrow_mut();
        match self.backend.kind {
            DriverKind::Local => TimeQuery::Ready(state.position),
            DriverKind::Remote => {
                state.pending_query = Some(generation);
                TimeQuery::Pending
            }
        }
    }
}
