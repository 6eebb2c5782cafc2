//! Playback manager - transport orchestration
//!
//! Binds the queue and transport state to whichever backend driver matches
//! the current track, runs the track-change protocol, and resolves the end
//! of a track through the repeat policy.
//!
//! Everything runs on the host's single thread. The host forwards UI actions
//! to the control surface, forwards backend callbacks to
//! [`PlaybackManager::handle_driver_event`], and calls
//! [`PlaybackManager::poll_progress`] on its timer. Nothing here blocks.

use crate::{
    driver::{DriverEvent, DriverEventKind, DriverKind, Drivers, Generation, PlaybackDriver, TimeQuery},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    history::{HistoryStore, RecentlyPlayed},
    poller::ProgressPoller,
    queue::Queue,
    store::{PlaybackSnapshot, StateStore, SubscriptionId},
    transport::Transport,
    types::{Direction, PlaybackConfig, PlaybackPhase, Visibility},
    volume::Volume,
};
use std::time::Duration;
use tracing::{debug, info, warn};
use wavedeck_core::{RepeatMode, Track};

/// Transport orchestrator and the single control surface for a session
pub struct PlaybackManager {
    config: PlaybackConfig,

    queue: Queue,
    transport: Transport,
    volume: Volume,
    repeat: RepeatMode,

    // Backend singletons and the one currently bound to the transport
    drivers: Drivers,
    active_driver: Option<DriverKind>,

    poller: ProgressPoller,
    visibility: Visibility,

    history: RecentlyPlayed,
    history_store: Option<Box<dyn HistoryStore>>,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
    store: StateStore,
}

impl PlaybackManager {
    /// Create new playback manager
    ///
    /// `remote` and `local` are the session's two backend instances; they
    /// live until [`PlaybackManager::shutdown`].
    pub fn new(
        config: PlaybackConfig,
        remote: Box<dyn PlaybackDriver>,
        local: Box<dyn PlaybackDriver>,
    ) -> Self {
        let mut queue = Queue::new();
        if config.shuffle {
            queue.shuffle();
        }

        Self {
            queue,
            transport: Transport::new(),
            volume: Volume::new(config.volume),
            repeat: config.repeat,
            drivers: Drivers::new(remote, local),
            active_driver: None,
            poller: ProgressPoller::new(config.poll_interval()),
            visibility: Visibility::Visible,
            history: RecentlyPlayed::new(config.history_size),
            history_store: None,
            pending_events: Vec::new(),
            store: StateStore::new(),
            config,
        }
    }

    /// Attach durable storage for the recently played list
    ///
    /// Stored entries are loaded right away. A store that fails to load is
    /// still used for saving.
    #[must_use]
    pub fn with_history_store(mut self, store: Box<dyn HistoryStore>) -> Self {
        match store.load() {
            Ok(tracks) => {
                self.history = RecentlyPlayed::from_tracks(tracks, self.config.history_size);
                debug!(entries = self.history.len(), "Loaded recently played history");
            }
            Err(err) => warn!(error = %err, "Failed to load recently played history"),
        }
        self.history_store = Some(store);
        self
    }

    // ===== Playback Control =====

    /// Make `track` current and start it
    ///
    /// Interrupts whatever was loading or playing. The track does not have to
    /// be in the queue.
    pub fn set_current_track(&mut self, track: Track) {
        self.change_track(track);
        self.notify();
    }

    /// Flip the play/pause intent
    ///
    /// No-op without a current track. After playback stopped at the end of
    /// the queue, playing again restarts the finished track from 0.
    pub fn toggle_play(&mut self) {
        if self.transport.current_track().is_none() {
            return;
        }

        if self.transport.is_finished() && !self.transport.is_playing() {
            self.transport.set_intent(true);
            self.seek_driver(Duration::ZERO);
        } else {
            self.transport.toggle_intent();
        }

        self.apply_intent();
        self.emit_state();
        self.notify();
    }

    /// Skip forward
    ///
    /// At the end of the queue: `all` wraps, `one` reloads the current track,
    /// `none` does nothing.
    pub fn play_next(&mut self) {
        if let Some(track) = self.neighbour(Direction::Next) {
            self.change_track(track);
            self.notify();
        }
    }

    /// Skip back, or restart the current track
    ///
    /// Past the restart threshold the current track restarts from 0;
    /// otherwise the previous queue entry starts. No-op at index 0.
    pub fn play_previous(&mut self) {
        if self.queue.is_empty() || self.transport.current_track().is_none() {
            return;
        }

        if self.transport.progress() > self.config.restart_threshold() {
            debug!("Restarting current track instead of going back");
            self.seek_driver(Duration::ZERO);
            self.emit_position();
            self.notify();
            return;
        }

        if let Some(track) = self.neighbour(Direction::Previous) {
            self.change_track(track);
            self.notify();
        }
    }

    /// Replace the queue with `tracks` and start at `start_index`
    pub fn play_context(&mut self, tracks: Vec<Track>, start_index: usize) -> Result<()> {
        if tracks.is_empty() {
            return Err(PlaybackError::QueueEmpty);
        }
        let start = tracks
            .get(start_index)
            .cloned()
            .ok_or(PlaybackError::IndexOutOfBounds(start_index))?;

        // Current must be set first so a shuffled context pins the start track
        self.queue.set_current(&start);
        self.queue.replace(tracks);
        self.emit_queue();

        self.change_track(start);
        self.notify();
        Ok(())
    }

    /// Start the queue entry at `index`
    pub fn skip_to(&mut self, index: usize) -> Result<()> {
        let track = self
            .queue
            .get(index)
            .cloned()
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;

        self.change_track(track);
        self.notify();
        Ok(())
    }

    // ===== Seek =====

    /// User-requested seek within the current track
    pub fn seek(&mut self, position: Duration) {
        if self.seek_driver(position) {
            self.emit_position();
        }
        self.notify();
    }

    // ===== Volume =====

    /// Set volume (clamped to 0.0-1.0); unmutes
    pub fn set_volume(&mut self, level: f32) {
        self.volume.set_level(level);
        self.apply_volume();
    }

    /// Mute audio
    pub fn mute(&mut self) {
        self.volume.mute();
        self.apply_volume();
    }

    /// Unmute audio
    pub fn unmute(&mut self) {
        self.volume.unmute();
        self.apply_volume();
    }

    /// Toggle mute
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_volume();
    }

    // ===== Queue Management =====

    /// Append a track to the queue
    pub fn enqueue(&mut self, track: Track) {
        self.queue.enqueue(track);
        self.emit_queue();
        self.notify();
    }

    /// Remove the first queue entry with `id`
    ///
    /// Removing the current track does not stop it.
    pub fn dequeue(&mut self, id: &str) -> Option<Track> {
        let removed = self.queue.dequeue(id);
        if removed.is_some() {
            self.emit_queue();
            self.notify();
        }
        removed
    }

    /// Empty the queue; the current track keeps playing
    pub fn clear_queue(&mut self) {
        self.queue.clear();
        self.emit_queue();
        self.notify();
    }

    // ===== Shuffle & Repeat =====

    /// Turn shuffle on or off
    pub fn toggle_shuffle(&mut self) {
        if self.queue.is_shuffled() {
            self.queue.unshuffle();
        } else {
            self.queue.shuffle();
        }

        self.emit(PlaybackEvent::ShuffleChanged {
            is_shuffled: self.queue.is_shuffled(),
        });
        self.emit_queue();
        self.notify();
    }

    /// Cycle repeat: none → all → one → none
    pub fn toggle_repeat(&mut self) {
        self.set_repeat(self.repeat.cycle());
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        if self.repeat == mode {
            return;
        }
        self.repeat = mode;
        self.emit(PlaybackEvent::RepeatChanged { mode });
        self.notify();
    }

    // ===== Host Integration =====

    /// Page visibility changed
    ///
    /// Hiding never pauses: the remote player keeps producing audio in a
    /// background tab. Becoming visible re-applies the play intent.
    pub fn set_visibility(&mut self, visibility: Visibility) {
        let was_hidden = self.visibility == Visibility::Hidden;
        self.visibility = visibility;

        if was_hidden && visibility == Visibility::Visible {
            debug!("Visible again, re-applying play intent");
            self.apply_intent();
        }
    }

    /// Timer hook, called by the host every [`PlaybackManager::poll_interval`]
    ///
    /// Does nothing unless the current load is playing. The local backend
    /// answers immediately; the remote backend answers later with a
    /// `TimeUpdate` event.
    pub fn poll_progress(&mut self) {
        let generation = self.transport.generation();
        if !self.poller.should_poll(generation) {
            return;
        }
        let Some(kind) = self.active_driver else {
            return;
        };

        match self.drivers.get_mut(kind).current_time(generation) {
            TimeQuery::Ready(position) => self.on_progress(position),
            TimeQuery::Pending => {}
        }
    }

    /// Feed a backend callback into the transport
    ///
    /// Events tagged with an old generation are dropped.
    pub fn handle_driver_event(&mut self, event: DriverEvent) {
        let current = self.transport.generation();
        if !self.transport.is_current(event.generation) {
            debug!(
                stale = event.generation.0,
                current = current.0,
                event = ?event.kind,
                "Ignoring stale driver event"
            );
            return;
        }

        match event.kind {
            DriverEventKind::Ready => self.on_ready(),
            DriverEventKind::MetadataLoaded(duration) => {
                if self.transport.set_duration(duration) {
                    self.emit(PlaybackEvent::DurationChanged {
                        duration_ms: duration.as_millis() as u64,
                    });
                }
                self.on_ready();
            }
            DriverEventKind::TimeUpdate(position) => self.on_progress(position),
            DriverEventKind::Seeked => self.transport.ack_seek(),
            DriverEventKind::Ended => self.on_track_ended(),
            DriverEventKind::Error(message) => {
                let kind = self.active_driver.unwrap_or(DriverKind::Local);
                self.fail(PlaybackError::driver(kind, message));
            }
        }
        self.notify();
    }

    /// Tear both backends down and return to `Idle`
    pub fn shutdown(&mut self) {
        self.poller.disarm();
        self.drivers.shutdown();
        self.active_driver = None;
        self.queue.clear_current();
        self.transport.reset();
        self.persist_history();
        self.emit_state();
        self.notify();
        info!("Playback session shut down");
    }

    // ===== Observation =====

    /// Current observable state
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_track: self.transport.current_track().cloned(),
            is_playing: self.transport.is_playing(),
            volume: self.volume.level(),
            is_muted: self.volume.is_muted(),
            progress: self.transport.progress().as_secs_f64(),
            duration: self.transport.duration().as_secs_f64(),
            queue: self.queue.items().to_vec(),
            is_shuffled: self.queue.is_shuffled(),
            repeat_mode: self.repeat,
            phase: self.transport.phase(),
        }
    }

    /// Receive a snapshot now and after every state change
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&PlaybackSnapshot) + 'static,
    {
        let id = self.store.subscribe(listener);
        self.notify();
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== State Queries =====

    pub fn current_track(&self) -> Option<&Track> {
        self.transport.current_track()
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    /// Whether playback stopped at the end of the queue
    pub fn is_finished(&self) -> bool {
        self.transport.is_finished()
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.transport.phase()
    }

    pub fn progress(&self) -> Duration {
        self.transport.progress()
    }

    pub fn duration(&self) -> Option<Duration> {
        let duration = self.transport.duration();
        (!duration.is_zero()).then_some(duration)
    }

    pub fn volume(&self) -> f32 {
        self.volume.level()
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    pub fn queue(&self) -> &[Track] {
        self.queue.items()
    }

    /// Index of the current track in the queue (first match by id)
    pub fn queue_position(&self) -> Option<usize> {
        self.queue.position_of_current()
    }

    pub fn is_shuffled(&self) -> bool {
        self.queue.is_shuffled()
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Generation of the live load; backends tag their events with it
    pub fn generation(&self) -> Generation {
        self.transport.generation()
    }

    /// Backend bound to the current track
    pub fn active_driver(&self) -> Option<DriverKind> {
        self.active_driver
    }

    /// Whether the host's progress timer should currently fire
    pub fn is_polling(&self) -> bool {
        self.poller.should_poll(self.transport.generation())
    }

    pub fn poll_interval(&self) -> Duration {
        self.poller.interval()
    }

    /// Recently played tracks, newest first
    pub fn recently_played(&self) -> &RecentlyPlayed {
        &self.history
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    // ===== Track-Change Protocol =====

    /// Stop the old backend, load the new one, apply volume, honor intent,
    /// record history, adopt the provisional duration
    fn change_track(&mut self, track: Track) {
        let previous_track_id = self.transport.current_track().map(|t| t.id.clone());

        // 1. Release the previous backend
        self.poller.disarm();
        if let Some(previous) = self.active_driver.take() {
            if let Err(err) = self.drivers.get_mut(previous).stop() {
                warn!(driver = %previous, error = %err, "Failed to stop previous driver");
            }
        }

        // Duration (6) is adopted by begin_load
        self.queue.set_current(&track);
        let generation = self.transport.begin_load(track.clone());
        let kind = DriverKind::for_track(&track.kind);
        self.active_driver = Some(kind);

        info!(
            track_id = %track.id,
            driver = %kind,
            generation = generation.0,
            "Track changed"
        );
        self.emit(PlaybackEvent::TrackChanged {
            track_id: track.id.clone(),
            previous_track_id,
        });

        // 2. Load
        let volume = self.volume.effective();
        let driver = self.drivers.get_mut(kind);
        let loaded = driver
            .load(track.resource(), generation)
            // 3. Volume
            .and_then(|()| driver.set_volume(volume));

        // 4. Intent
        let loaded = match loaded {
            Ok(()) => {
                self.apply_intent();
                true
            }
            Err(err) => {
                self.fail(err);
                false
            }
        };

        // 5. History, recorded even when the load failed
        self.history.record(track.clone());
        self.persist_history();

        if loaded {
            self.emit_state();
            if !track.duration.is_zero() {
                self.emit_position();
            }
        }
    }

    /// Queue entry next to the current track, per the repeat mode
    fn neighbour(&self, direction: Direction) -> Option<Track> {
        self.queue
            .advance(direction, self.repeat)
            .and_then(|index| self.queue.get(index))
            .cloned()
    }

    // ===== Driver Callbacks =====

    fn on_ready(&mut self) {
        if self.transport.mark_ready() {
            self.emit_state();
        }
    }

    fn on_progress(&mut self, position: Duration) {
        if self.transport.report_progress(position) {
            self.emit_position();
        }
    }

    /// Resolve `Ended` through the repeat policy
    fn on_track_ended(&mut self) {
        let Some(track_id) = self.transport.current_track().map(|t| t.id.clone()) else {
            return;
        };

        self.transport.mark_ended();
        self.emit(PlaybackEvent::TrackFinished {
            track_id: track_id.clone(),
        });

        if self.repeat == RepeatMode::One {
            debug!(track_id = %track_id, "Repeating track");
            self.transport.restart();
            if self.command(|driver| {
                driver.seek(Duration::ZERO)?;
                driver.play()
            }) {
                self.poller.arm(self.transport.generation());
                self.emit_state();
                self.emit_position();
            }
            return;
        }

        match self.neighbour(Direction::Next) {
            Some(next) => self.change_track(next),
            None => self.stop_at_end(),
        }
    }

    /// Repeat none, end of the queue: keep the track, drop the intent
    fn stop_at_end(&mut self) {
        info!("Reached end of queue");
        self.transport.stop_at_end();
        self.poller.disarm();
        if let Some(kind) = self.active_driver {
            if let Err(err) = self.drivers.get_mut(kind).pause() {
                warn!(driver = %kind, error = %err, "Failed to pause at end of queue");
            }
        }
        self.emit_state();
    }

    // ===== Driver Commands =====

    /// Run a command against the active backend
    ///
    /// A failing command is a playback error for the current track. Returns
    /// whether the command went through.
    fn command<F>(&mut self, op: F) -> bool
    where
        F: FnOnce(&mut dyn PlaybackDriver) -> Result<()>,
    {
        let Some(kind) = self.active_driver else {
            return false;
        };

        match op(self.drivers.get_mut(kind)) {
            Ok(()) => true,
            Err(err) => {
                self.fail(err);
                false
            }
        }
    }

    /// Command the backend to match the play intent, arming the poller
    fn apply_intent(&mut self) {
        if self.transport.current_track().is_none() {
            return;
        }

        if self.transport.is_playing() {
            if self.command(|driver| driver.play()) {
                self.poller.arm(self.transport.generation());
            }
        } else {
            self.poller.disarm();
            self.command(|driver| driver.pause());
        }
    }

    /// Seek the transport and the backend; returns whether a seek was issued
    fn seek_driver(&mut self, position: Duration) -> bool {
        match self.transport.seek(position) {
            Some(target) => self.command(|driver| driver.seek(target)),
            None => false,
        }
    }

    fn apply_volume(&mut self) {
        let level = self.volume.effective();
        self.command(|driver| driver.set_volume(level));
        self.emit(PlaybackEvent::VolumeChanged {
            level: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
        self.notify();
    }

    /// Load or playback failure: pause, notify, no retry, no skip
    fn fail(&mut self, err: PlaybackError) {
        let track_id = self.transport.current_track().map(|t| t.id.clone());
        warn!(track_id = ?track_id, error = %err, "Playback failed");

        self.transport.fail();
        self.poller.disarm();
        self.emit(PlaybackEvent::Error {
            track_id,
            message: err.to_string(),
        });
        self.emit_state();
    }

    fn persist_history(&mut self) {
        if let Some(store) = self.history_store.as_mut() {
            if let Err(err) = store.save(&self.history.to_vec()) {
                warn!(error = %err, "Failed to persist recently played history");
            }
        }
    }

    // ===== Events =====

    fn emit(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }

    fn emit_state(&mut self) {
        self.emit(PlaybackEvent::StateChanged {
            phase: self.transport.phase(),
            is_playing: self.transport.is_playing(),
        });
    }

    fn emit_position(&mut self) {
        self.emit(PlaybackEvent::PositionUpdate {
            position_ms: self.transport.progress().as_millis() as u64,
            duration_ms: self.transport.duration().as_millis() as u64,
        });
    }

    fn emit_queue(&mut self) {
        self.emit(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    /// Publish a snapshot to subscribers, if there are any
    fn notify(&mut self) {
        if self.store.subscriber_count() == 0 {
            return;
        }
        let snapshot = self.snapshot();
        self.store.publish(snapshot);
    }
}

impl std::fmt::Debug for PlaybackManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackManager")
            .field("phase", &self.transport.phase())
            .field("generation", &self.transport.generation())
            .field("active_driver", &self.active_driver)
            .field("queue_len", &self.queue.len())
            .field("repeat", &self.repeat)
            .finish_non_exhaustive()
    }
}
