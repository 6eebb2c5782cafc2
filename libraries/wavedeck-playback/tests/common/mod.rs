//! Shared test harness: recording drivers and track builders

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use wavedeck_core::Track;
use wavedeck_playback::{
    DriverEvent, DriverEventKind, DriverKind, Generation, HistoryStore, MemoryHistoryStore,
    PlaybackConfig, PlaybackDriver, PlaybackError, PlaybackManager, Result, TimeQuery,
};

/// Command a driver received
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Load {
        kind: DriverKind,
        resource: String,
        generation: Generation,
    },
    Play(DriverKind),
    Pause(DriverKind),
    Stop(DriverKind),
    Seek(DriverKind, Duration),
    Volume(DriverKind, f32),
    TimeQuery(DriverKind, Generation),
}

impl Command {
    pub fn kind(&self) -> DriverKind {
        match self {
            Command::Load { kind, .. } => *kind,
            Command::Play(kind)
            | Command::Pause(kind)
            | Command::Stop(kind)
            | Command::Seek(kind, _)
            | Command::Volume(kind, _)
            | Command::TimeQuery(kind, _) => *kind,
        }
    }
}

pub type CommandLog = Rc<RefCell<Vec<Command>>>;

/// Driver that records every command
///
/// The remote flavour answers time queries asynchronously (`Pending`), the
/// local flavour synchronously from `clock`.
pub struct RecordingDriver {
    kind: DriverKind,
    log: CommandLog,
    clock: Rc<Cell<Duration>>,
    fail_loads: Rc<Cell<bool>>,
}

impl PlaybackDriver for RecordingDriver {
    fn kind(&self) -> DriverKind {
        self.kind
    }

    fn load(&mut self, resource: &str, generation: Generation) -> Result<()> {
        self.log.borrow_mut().push(Command::Load {
            kind: self.kind,
            resource: resource.to_string(),
            generation,
        });
        if self.fail_loads.get() {
            return Err(PlaybackError::driver(self.kind, "resource unavailable"));
        }
        self.clock.set(Duration::ZERO);
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.log.borrow_mut().push(Command::Play(self.kind));
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.log.borrow_mut().push(Command::Pause(self.kind));
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.log.borrow_mut().push(Command::Stop(self.kind));
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.log.borrow_mut().push(Command::Seek(self.kind, position));
        self.clock.set(position);
        Ok(())
    }

    fn set_volume(&mut self, level: f32) -> Result<()> {
        self.log.borrow_mut().push(Command::Volume(self.kind, level));
        Ok(())
    }

    fn current_time(&mut self, generation: Generation) -> TimeQuery {
        self.log
            .borrow_mut()
            .push(Command::TimeQuery(self.kind, generation));
        match self.kind {
            DriverKind::Remote => TimeQuery::Pending,
            DriverKind::Local => TimeQuery::Ready(self.clock.get()),
        }
    }
}

/// Manager wired to two recording drivers
pub struct Harness {
    pub manager: PlaybackManager,
    pub log: CommandLog,
    /// Position the local driver reports
    pub local_clock: Rc<Cell<Duration>>,
    pub fail_loads: Rc<Cell<bool>>,
    pub history: MemoryHistoryStore,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(PlaybackConfig::default())
    }

    pub fn with_config(config: PlaybackConfig) -> Self {
        let history = MemoryHistoryStore::new();
        let log: CommandLog = Rc::new(RefCell::new(Vec::new()));
        Self::build(config, log, Box::new(history.clone()), history)
    }

    /// Harness persisting history to `store`, with drivers writing to `log`
    pub fn with_history_store(store: impl HistoryStore + 'static, log: CommandLog) -> Self {
        Self::build(
            PlaybackConfig::default(),
            log,
            Box::new(store),
            MemoryHistoryStore::new(),
        )
    }

    fn build(
        config: PlaybackConfig,
        log: CommandLog,
        store: Box<dyn HistoryStore>,
        history: MemoryHistoryStore,
    ) -> Self {
        let local_clock = Rc::new(Cell::new(Duration::ZERO));
        let fail_loads = Rc::new(Cell::new(false));

        let remote = RecordingDriver {
            kind: DriverKind::Remote,
            log: Rc::clone(&log),
            clock: Rc::new(Cell::new(Duration::ZERO)),
            fail_loads: Rc::clone(&fail_loads),
        };
        let local = RecordingDriver {
            kind: DriverKind::Local,
            log: Rc::clone(&log),
            clock: Rc::clone(&local_clock),
            fail_loads: Rc::clone(&fail_loads),
        };

        let manager = PlaybackManager::new(config, Box::new(remote), Box::new(local))
            .with_history_store(store);

        Self {
            manager,
            log,
            local_clock,
            fail_loads,
            history,
        }
    }

    /// Deliver an event tagged with the live generation
    pub fn emit(&mut self, kind: DriverEventKind) {
        let generation = self.manager.generation();
        self.manager
            .handle_driver_event(DriverEvent::new(generation, kind));
    }

    /// Driver reports ready
    pub fn ready(&mut self) {
        self.emit(DriverEventKind::Ready);
    }

    /// Driver reports the end of the live track
    pub fn ended(&mut self) {
        self.emit(DriverEventKind::Ended);
    }

    /// Informational position report for the live track
    pub fn time_update(&mut self, secs: u64) {
        self.emit(DriverEventKind::TimeUpdate(Duration::from_secs(secs)));
    }

    pub fn current_id(&self) -> Option<String> {
        self.manager.current_track().map(|t| t.id.clone())
    }

    pub fn commands(&self) -> Vec<Command> {
        self.log.borrow().clone()
    }

    pub fn clear_log(&mut self) {
        self.log.borrow_mut().clear();
    }

    /// Load commands received so far
    pub fn loads(&self) -> Vec<Command> {
        self.log
            .borrow()
            .iter()
            .filter(|c| matches!(c, Command::Load { .. }))
            .cloned()
            .collect()
    }
}

pub fn remote_track(id: &str) -> Track {
    Track::remote(id, format!("Track {}", id), "Test Artist", format!("vid-{}", id))
        .with_duration(Duration::from_secs(180))
}

pub fn local_track(id: &str) -> Track {
    Track::local(id, format!("Track {}", id), "Local Artist", format!("/music/{}.mp3", id))
}

pub fn remote_tracks(ids: &[&str]) -> Vec<Track> {
    ids.iter().map(|id| remote_track(id)).collect()
}

pub fn ids(tracks: &[Track]) -> Vec<String> {
    tracks.iter().map(|t| t.id.clone()).collect()
}
