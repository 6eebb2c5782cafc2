//! Transport state machine
//!
//! ```text
//!            begin_load              mark_ready (intent = play)
//!   Idle ─────────────▶ Loading ─────────────────────▶ Playing
//!                          │                            ▲  │
//!                          │ mark_ready (intent = pause)│  │ toggle_intent
//!                          ▼                            │  ▼
//!                        Paused ◀───────────────────────┴─ Paused
//!
//!   Playing ── mark_ended ──▶ Ended ── (orchestrator: restart / begin_load / stop_at_end)
//!   any ── begin_load ──▶ Loading (new generation)
//! ```
//!
//! The transport holds no driver handle. It records user intent and what the
//! active driver reported, and hands out the [`Generation`] each load is
//! tagged with.

use crate::driver::Generation;
use crate::types::PlaybackPhase;
use std::time::Duration;
use wavedeck_core::Track;

/// Progress reports within this distance of a pending seek target count as
/// the seek having landed.
const SEEK_TOLERANCE: Duration = Duration::from_millis(1500);

/// Play/pause intent, position and duration of the current track
#[derive(Debug, Clone, Default)]
pub struct Transport {
    phase: PlaybackPhase,
    current_track: Option<Track>,

    /// User intent, not necessarily what the driver is doing yet
    is_playing: bool,

    progress: Duration,

    /// Zero until known
    duration: Duration,

    generation: Generation,

    /// A user seek the driver has not confirmed yet
    pending_seek: Option<Duration>,

    /// Set when playback stopped at the end of the queue
    finished: bool,
}

impl Transport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a track change
    ///
    /// Moves to `Loading` from any phase, bumps the generation, resets
    /// progress, sets the intent to play and adopts the track's pre-known
    /// duration as a provisional value.
    pub fn begin_load(&mut self, track: Track) -> Generation {
        self.generation = self.generation.next();
        self.duration = track.duration;
        self.current_track = Some(track);
        self.phase = PlaybackPhase::Loading;
        self.is_playing = true;
        self.progress = Duration::ZERO;
        self.pending_seek = None;
        self.finished = false;
        self.generation
    }

    /// Driver is ready: leave `Loading` according to the intent
    ///
    /// Returns `false` when not loading.
    pub fn mark_ready(&mut self) -> bool {
        if self.phase != PlaybackPhase::Loading {
            return false;
        }
        self.phase = self.settled_phase();
        true
    }

    /// Flip the play intent
    ///
    /// Returns the new intent, or `None` when there is no current track.
    pub fn toggle_intent(&mut self) -> Option<bool> {
        self.current_track.as_ref()?;
        self.set_intent(!self.is_playing);
        Some(self.is_playing)
    }

    /// Set the play intent
    ///
    /// `Playing`/`Paused` follow the intent immediately. `Loading` keeps
    /// loading and picks the intent up in [`Transport::mark_ready`]. Pausing
    /// drops any unconfirmed seek.
    pub fn set_intent(&mut self, playing: bool) {
        if self.current_track.is_none() {
            return;
        }

        self.is_playing = playing;
        if playing {
            self.finished = false;
        } else {
            self.pending_seek = None;
        }
        if matches!(self.phase, PlaybackPhase::Playing | PlaybackPhase::Paused) {
            self.phase = self.settled_phase();
        }
    }

    /// Informational position report from the driver
    ///
    /// Never issues a seek. Ignored while a user seek is pending unless the
    /// report lands near the seek target. Returns whether progress changed.
    pub fn report_progress(&mut self, position: Duration) -> bool {
        if self.current_track.is_none() {
            return false;
        }

        if let Some(target) = self.pending_seek {
            if abs_diff(position, target) > SEEK_TOLERANCE {
                return false;
            }
            self.pending_seek = None;
        }

        let position = self.clamp(position);
        if position == self.progress {
            return false;
        }
        self.progress = position;
        true
    }

    /// User-requested seek
    ///
    /// Returns the clamped target the driver must be sent to, or `None` when
    /// there is no current track.
    pub fn seek(&mut self, position: Duration) -> Option<Duration> {
        self.current_track.as_ref()?;

        let target = self.clamp(position);
        self.progress = target;
        self.pending_seek = Some(target);
        self.finished = false;
        Some(target)
    }

    /// Driver confirmed the last seek
    pub fn ack_seek(&mut self) {
        self.pending_seek = None;
    }

    /// Authoritative duration reported by the driver
    ///
    /// Progress and an unconfirmed seek target are clamped to it. Returns
    /// whether the duration changed.
    pub fn set_duration(&mut self, duration: Duration) -> bool {
        if self.current_track.is_none() || duration == self.duration {
            return false;
        }
        self.duration = duration;
        self.progress = self.clamp(self.progress);
        let pending = self.pending_seek.map(|target| self.clamp(target));
        self.pending_seek = pending;
        true
    }

    /// Driver reported the end of the track
    pub fn mark_ended(&mut self) {
        if self.current_track.is_some() {
            self.phase = PlaybackPhase::Ended;
        }
    }

    /// Replay the current track from 0 without a reload
    pub fn restart(&mut self) {
        if self.current_track.is_none() {
            return;
        }
        self.progress = Duration::ZERO;
        self.pending_seek = Some(Duration::ZERO);
        self.finished = false;
        if self.phase == PlaybackPhase::Ended {
            self.is_playing = true;
            self.phase = PlaybackPhase::Playing;
        }
    }

    /// Stop at the end of the queue
    ///
    /// The current track stays; the intent becomes pause.
    pub fn stop_at_end(&mut self) {
        if self.current_track.is_none() {
            return;
        }
        self.is_playing = false;
        self.phase = PlaybackPhase::Paused;
        self.pending_seek = None;
        self.finished = true;
    }

    /// Load or playback failure: back to `Paused` for this track
    pub fn fail(&mut self) {
        if self.current_track.is_none() {
            return;
        }
        self.is_playing = false;
        self.phase = PlaybackPhase::Paused;
        self.pending_seek = None;
    }

    /// Drop the current track and return to `Idle`
    ///
    /// Bumps the generation so late events for the dropped load are ignored.
    pub fn reset(&mut self) {
        let generation = self.generation.next();
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    /// Whether `generation` is the live load
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current_track.is_some() && generation == self.generation
    }

    fn settled_phase(&self) -> PlaybackPhase {
        if self.is_playing {
            PlaybackPhase::Playing
        } else {
            PlaybackPhase::Paused
        }
    }

    fn clamp(&self, position: Duration) -> Duration {
        if self.duration.is_zero() {
            position
        } else {
            position.min(self.duration)
        }
    }

    // ===== Getters =====

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn progress(&self) -> Duration {
        self.progress
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn has_pending_seek(&self) -> bool {
        self.pending_seek.is_some()
    }

    /// Whether playback stopped at the end of the queue on this track
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

fn abs_diff(a: Duration, b: Duration) -> Duration {
    if a > b {
        a - b
    } else {
        b - a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_track(id: &str) -> Track {
        Track::local(id, "Song", "Artist", format!("/music/{}.mp3", id))
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn starts_idle() {
        let transport = Transport::new();
        assert_eq!(transport.phase(), PlaybackPhase::Idle);
        assert!(transport.current_track().is_none());
        assert!(!transport.is_playing());
        assert_eq!(transport.generation(), Generation(0));
    }

    #[test]
    fn begin_load_resets_and_bumps_generation() {
        let mut transport = Transport::new();
        let first = transport.begin_load(create_test_track("a"));
        transport.mark_ready();
        transport.report_progress(secs(42));

        let second = transport.begin_load(create_test_track("b"));
        assert!(second > first);
        assert_eq!(transport.phase(), PlaybackPhase::Loading);
        assert_eq!(transport.progress(), Duration::ZERO);
        assert!(transport.is_playing());
        assert!(!transport.is_current(first));
        assert!(transport.is_current(second));
    }

    #[test]
    fn begin_load_adopts_known_duration() {
        let mut transport = Transport::new();
        transport.begin_load(create_test_track("a").with_duration(secs(200)));
        assert_eq!(transport.duration(), secs(200));

        transport.begin_load(create_test_track("b"));
        assert_eq!(transport.duration(), Duration::ZERO);
    }

    #[test]
    fn ready_follows_intent() {
        let mut transport = Transport::new();
        transport.begin_load(create_test_track("a"));
        assert!(transport.mark_ready());
        assert_eq!(transport.phase(), PlaybackPhase::Playing);

        transport.begin_load(create_test_track("b"));
        transport.set_intent(false);
        assert_eq!(transport.phase(), PlaybackPhase::Loading);
        transport.mark_ready();
        assert_eq!(transport.phase(), PlaybackPhase::Paused);

        // Only leaves Loading once
        assert!(!transport.mark_ready());
    }

    #[test]
    fn toggle_without_track_is_noop() {
        let mut transport = Transport::new();
        assert_eq!(transport.toggle_intent(), None);
        assert!(!transport.is_playing());
    }

    #[test]
    fn toggle_flips_between_playing_and_paused() {
        let mut transport = Transport::new();
        transport.begin_load(create_test_track("a"));
        transport.mark_ready();

        assert_eq!(transport.toggle_intent(), Some(false));
        assert_eq!(transport.phase(), PlaybackPhase::Paused);
        assert_eq!(transport.toggle_intent(), Some(true));
        assert_eq!(transport.phase(), PlaybackPhase::Playing);
    }

    #[test]
    fn progress_clamped_to_known_duration() {
        let mut transport = Transport::new();
        transport.begin_load(create_test_track("a").with_duration(secs(100)));
        transport.report_progress(secs(150));
        assert_eq!(transport.progress(), secs(100));
    }

    #[test]
    fn pending_seek_suppresses_stale_progress() {
        let mut transport = Transport::new();
        transport.begin_load(create_test_track("a"));
        transport.mark_ready();
        transport.report_progress(secs(10));

        assert_eq!(transport.seek(secs(60)), Some(secs(60)));
        assert!(transport.has_pending_seek());

        // Report from before the seek landed
        assert!(!transport.report_progress(secs(11)));
        assert_eq!(transport.progress(), secs(60));

        // Report near the target clears the pending seek
        assert!(transport.report_progress(secs(61)));
        assert!(!transport.has_pending_seek());
        assert!(transport.report_progress(secs(12)));
    }

    #[test]
    fn ack_seek_clears_pending() {
        let mut transport = Transport::new();
        transport.begin_load(create_test_track("a"));
        transport.seek(secs(30));
        transport.ack_seek();
        assert!(transport.report_progress(secs(2)));
    }

    #[test]
    fn duration_clamps_pending_seek() {
        let mut transport = Transport::new();
        transport.begin_load(create_test_track("a"));
        transport.mark_ready();
        transport.seek(secs(500));

        transport.set_duration(secs(200));
        assert_eq!(transport.progress(), secs(200));
        assert!(transport.has_pending_seek());

        assert!(transport.report_progress(secs(199)));
        assert!(!transport.has_pending_seek());
        assert!(transport.report_progress(secs(20)));
    }

    #[test]
    fn pause_drops_pending_seek() {
        let mut transport = Transport::new();
        transport.begin_load(create_test_track("a"));
        transport.mark_ready();
        transport.seek(secs(90));

        transport.set_intent(false);
        assert!(!transport.has_pending_seek());
        assert!(transport.report_progress(secs(5)));
    }

    #[test]
    fn seek_without_track() {
        let mut transport = Transport::new();
        assert_eq!(transport.seek(secs(5)), None);
    }

    #[test]
    fn duration_overrides_track_value() {
        let mut transport = Transport::new();
        transport.begin_load(create_test_track("a").with_duration(secs(200)));
        transport.report_progress(secs(190));

        assert!(transport.set_duration(secs(180)));
        assert_eq!(transport.duration(), secs(180));
        assert_eq!(transport.progress(), secs(180));
        assert!(!transport.set_duration(secs(180)));
    }

    #[test]
    fn restart_after_end() {
        let mut transport = Transport::new();
        transport.begin_load(create_test_track("a"));
        transport.mark_ready();
        transport.report_progress(secs(99));
        transport.mark_ended();
        assert_eq!(transport.phase(), PlaybackPhase::Ended);

        let generation = transport.generation();
        transport.restart();
        assert_eq!(transport.phase(), PlaybackPhase::Playing);
        assert_eq!(transport.progress(), Duration::ZERO);
        assert_eq!(transport.generation(), generation);
    }

    #[test]
    fn stop_at_end_keeps_track() {
        let mut transport = Transport::new();
        transport.begin_load(create_test_track("a"));
        transport.mark_ready();
        transport.mark_ended();
        transport.stop_at_end();

        assert_eq!(transport.current_track().unwrap().id, "a");
        assert!(!transport.is_playing());
        assert_eq!(transport.phase(), PlaybackPhase::Paused);
        assert!(transport.is_finished());

        transport.set_intent(true);
        assert!(!transport.is_finished());
    }

    #[test]
    fn fail_pauses() {
        let mut transport = Transport::new();
        transport.begin_load(create_test_track("a"));
        transport.fail();
        assert_eq!(transport.phase(), PlaybackPhase::Paused);
        assert!(!transport.is_playing());
    }

    #[test]
    fn reset_returns_to_idle_with_new_generation() {
        let mut transport = Transport::new();
        let generation = transport.begin_load(create_test_track("a"));
        transport.reset();

        assert_eq!(transport.phase(), PlaybackPhase::Idle);
        assert!(transport.current_track().is_none());
        assert!(transport.generation() > generation);
        assert!(!transport.is_current(transport.generation()));
    }
}
