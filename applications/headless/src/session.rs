//! Session runner
//!
//! Owns a [`PlaybackManager`] wired to two simulated backends and plays the
//! part of the browser host: it advances the backends on a timer, forwards
//! their callbacks, and calls the progress poll hook while playing.

use crate::config::AppConfig;
use crate::driver::{SimulatedBackend, SimulatedDriver};
use crate::error::Result;
use crossbeam_channel::Receiver;
use std::future::Future;
use std::rc::Rc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use wavedeck_core::Track;
use wavedeck_playback::{
    DriverEvent, DriverKind, HistoryStore, PlaybackEvent, PlaybackManager,
};

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Repeat none reached the end of the queue
    QueueFinished,
    /// Playback paused on an error and nothing will resume it
    Stalled,
    /// The shutdown signal fired
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub outcome: SessionOutcome,
    /// Track changes during the session, repeats included
    pub tracks_started: usize,
}

pub struct Session {
    config: AppConfig,
    manager: PlaybackManager,
    backends: [Rc<SimulatedBackend>; 2],
    events: Receiver<DriverEvent>,
    tracks_started: usize,
}

impl Session {
    /// Build a session whose backends can play every track in `library`
    pub fn new(config: AppConfig, library: &[Track], history: Box<dyn HistoryStore>) -> Self {
        let (events_tx, events) = crossbeam_channel::unbounded();
        let unknown_length = config.unknown_length();

        let remote = SimulatedBackend::new(DriverKind::Remote, library, unknown_length, events_tx.clone());
        let local = SimulatedBackend::new(DriverKind::Local, library, unknown_length, events_tx);

        let manager = PlaybackManager::new(
            config.playback.clone(),
            Box::new(SimulatedDriver::new(Rc::clone(&remote))),
            Box::new(SimulatedDriver::new(Rc::clone(&local))),
        )
        .with_history_store(history);

        Self {
            config,
            manager,
            backends: [remote, local],
            events,
            tracks_started: 0,
        }
    }

    pub fn manager(&self) -> &PlaybackManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut PlaybackManager {
        &mut self.manager
    }

    pub fn backend(&self, kind: DriverKind) -> &SimulatedBackend {
        match kind {
            DriverKind::Remote => &self.backends[0],
            DriverKind::Local => &self.backends[1],
        }
    }

    /// Replace the queue with `tracks` and start at `start`
    pub fn start(&mut self, tracks: Vec<Track>, start: usize) -> Result<()> {
        info!(tracks = tracks.len(), start, "Starting session");
        self.manager.play_context(tracks, start)?;
        self.pump();
        Ok(())
    }

    /// Advance both backends by one simulation step
    pub fn step(&mut self) {
        let step = self.config.step();
        for backend in &self.backends {
            backend.advance(step);
        }
        self.pump();
    }

    /// Progress timer hook
    pub fn poll(&mut self) {
        self.manager.poll_progress();
        self.pump();
    }

    /// Outcome if the session has nothing left to do
    pub fn outcome(&self) -> Option<SessionOutcome> {
        if self.manager.is_playing() {
            None
        } else if self.manager.is_finished() {
            Some(SessionOutcome::QueueFinished)
        } else {
            Some(SessionOutcome::Stalled)
        }
    }

    /// Drive the session until it finishes, stalls, or `shutdown` resolves
    ///
    /// Both backends are torn down before returning.
    pub async fn run<F>(&mut self, shutdown: F) -> SessionSummary
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut ticker = tokio::time::interval(self.config.tick());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut poller = tokio::time::interval(self.config.poll_period());
        poller.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let outcome = loop {
            if let Some(outcome) = self.outcome() {
                break outcome;
            }

            tokio::select! {
                () = &mut shutdown => {
                    info!("Shutdown requested");
                    break SessionOutcome::Interrupted;
                }
                _ = ticker.tick() => self.step(),
                _ = poller.tick() => self.poll(),
            }
        };

        self.manager.shutdown();
        self.pump();

        let summary = SessionSummary {
            outcome,
            tracks_started: self.tracks_started,
        };
        info!(outcome = ?summary.outcome, tracks = summary.tracks_started, "Session ended");
        summary
    }

    /// Forward backend callbacks, then log what the manager reported
    fn pump(&mut self) {
        // Handling an event may queue another (e.g. a repeat seek acknowledges)
        while let Ok(event) = self.events.try_recv() {
            self.manager.handle_driver_event(event);
        }

        for event in self.manager.drain_events() {
            match &event {
                PlaybackEvent::TrackChanged { track_id, .. } => {
                    self.tracks_started += 1;
                    info!(track_id = %track_id, "Now playing");
                }
                PlaybackEvent::TrackFinished { track_id } => {
                    debug!(track_id = %track_id, "Track finished");
                }
                PlaybackEvent::Error { track_id, message } => {
                    warn!(track_id = ?track_id, message = %message, "Playback error");
                }
                other => debug!(event = ?other, "Playback event"),
            }
        }
    }
}
