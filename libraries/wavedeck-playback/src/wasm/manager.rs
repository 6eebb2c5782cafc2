//! WASM-compatible PlaybackManager wrapper

use super::driver::{JsBackend, JsDriver};
use super::storage::LocalStorageHistory;
use crate::{
    DriverEvent, DriverKind, PlaybackConfig, PlaybackError, PlaybackManager, SubscriptionId,
    Visibility,
};
use js_sys::Function;
use serde::Serialize;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wavedeck_core::{RepeatMode, Track};

/// WASM-compatible playback manager
///
/// This wraps the core PlaybackManager with a JavaScript-friendly API.
#[wasm_bindgen]
pub struct WasmPlaybackManager {
    inner: PlaybackManager,

    // Event callback; without one, events wait for drainEvents()
    on_event: Option<Function>,

    // JS-facing subscription handles
    subscriptions: Vec<(u32, SubscriptionId)>,
    next_subscription: u32,
}

#[wasm_bindgen]
impl WasmPlaybackManager {
    /// Create a new playback manager
    ///
    /// `config` is an optional partial `PlaybackConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(remote: JsBackend, local: JsBackend, config: JsValue) -> Result<WasmPlaybackManager, JsValue> {
        // Enable panic hooks for better error messages in console
        console_error_panic_hook::set_once();

        let config: PlaybackConfig = if config.is_undefined() || config.is_null() {
            PlaybackConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };

        let inner = PlaybackManager::new(
            config,
            Box::new(JsDriver::new(DriverKind::Remote, remote)),
            Box::new(JsDriver::new(DriverKind::Local, local)),
        )
        .with_history_store(Box::new(LocalStorageHistory::default()));

        Ok(Self {
            inner,
            on_event: None,
            subscriptions: Vec::new(),
            next_subscription: 0,
        })
    }

    // ===== Playback Control =====

    /// Make a track current and start it
    #[wasm_bindgen(js_name = setCurrentTrack)]
    pub fn set_current_track(&mut self, track: JsValue) -> Result<(), JsValue> {
        let track = parse_track(track)?;
        self.inner.set_current_track(track);
        self.flush();
        Ok(())
    }

    /// Flip play/pause
    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&mut self) {
        self.inner.toggle_play();
        self.flush();
    }

    /// Skip to next track
    #[wasm_bindgen(js_name = playNext)]
    pub fn play_next(&mut self) {
        self.inner.play_next();
        self.flush();
    }

    /// Go to previous track (or restart the current one)
    #[wasm_bindgen(js_name = playPrevious)]
    pub fn play_previous(&mut self) {
        self.inner.play_previous();
        self.flush();
    }

    /// Replace the queue and start at `startIndex`
    #[wasm_bindgen(js_name = playContext)]
    pub fn play_context(&mut self, tracks: JsValue, start_index: usize) -> Result<(), JsValue> {
        let tracks: Vec<Track> = serde_wasm_bindgen::from_value(tracks)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse tracks: {}", e)))?;

        let result = self.inner.play_context(tracks, start_index);
        self.flush();
        result.map_err(to_js_error)
    }

    /// Start the queue entry at `index`
    #[wasm_bindgen(js_name = skipTo)]
    pub fn skip_to(&mut self, index: usize) -> Result<(), JsValue> {
        let result = self.inner.skip_to(index);
        self.flush();
        result.map_err(to_js_error)
    }

    // ===== Seeking =====

    /// Seek to position in seconds
    #[wasm_bindgen(js_name = setProgress)]
    pub fn set_progress(&mut self, seconds: f64) {
        self.inner.seek(secs(seconds));
        self.flush();
    }

    // ===== Volume Control =====

    /// Set volume (0.0-1.0, clamped)
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&mut self, level: f32) {
        self.inner.set_volume(level);
        self.flush();
    }

    /// Mute audio
    pub fn mute(&mut self) {
        self.inner.mute();
        self.flush();
    }

    /// Unmute audio
    pub fn unmute(&mut self) {
        self.inner.unmute();
        self.flush();
    }

    /// Toggle mute
    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&mut self) {
        self.inner.toggle_mute();
        self.flush();
    }

    // ===== Queue Management =====

    /// Append a track to the queue
    pub fn enqueue(&mut self, track: JsValue) -> Result<(), JsValue> {
        let track = parse_track(track)?;
        self.inner.enqueue(track);
        self.flush();
        Ok(())
    }

    /// Remove the first queue entry with `id`; returns it or `undefined`
    pub fn dequeue(&mut self, id: &str) -> JsValue {
        let removed = self.inner.dequeue(id);
        self.flush();
        removed.map_or(JsValue::UNDEFINED, |track| to_js(&track))
    }

    /// Clear entire queue
    #[wasm_bindgen(js_name = clearQueue)]
    pub fn clear_queue(&mut self) {
        self.inner.clear_queue();
        self.flush();
    }

    // ===== Shuffle & Repeat =====

    #[wasm_bindgen(js_name = toggleShuffle)]
    pub fn toggle_shuffle(&mut self) {
        self.inner.toggle_shuffle();
        self.flush();
    }

    #[wasm_bindgen(js_name = toggleRepeat)]
    pub fn toggle_repeat(&mut self) {
        self.inner.toggle_repeat();
        self.flush();
    }

    /// Set repeat mode ("none" | "all" | "one")
    #[wasm_bindgen(js_name = setRepeat)]
    pub fn set_repeat(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode = RepeatMode::from_str(mode)
            .ok_or_else(|| JsValue::from_str("Invalid repeat mode. Use 'none', 'all', or 'one'"))?;
        self.inner.set_repeat(mode);
        self.flush();
        Ok(())
    }

    // ===== Host Integration =====

    /// Report page visibility (`document.hidden`)
    #[wasm_bindgen(js_name = setVisibility)]
    pub fn set_visibility(&mut self, hidden: bool) {
        let visibility = if hidden {
            Visibility::Hidden
        } else {
            Visibility::Visible
        };
        self.inner.set_visibility(visibility);
        self.flush();
    }

    /// Timer hook; call every `pollIntervalMs`
    #[wasm_bindgen(js_name = pollProgress)]
    pub fn poll_progress(&mut self) {
        self.inner.poll_progress();
        self.flush();
    }

    /// Forward a backend callback: `{ generation, kind: { type, value? } }`
    #[wasm_bindgen(js_name = handleDriverEvent)]
    pub fn handle_driver_event(&mut self, event: JsValue) -> Result<(), JsValue> {
        let event: DriverEvent = serde_wasm_bindgen::from_value(event)
            .map_err(|e| JsValue::from_str(&format!("Invalid driver event: {}", e)))?;
        self.inner.handle_driver_event(event);
        self.flush();
        Ok(())
    }

    /// Generation to tag backend events with
    #[wasm_bindgen(getter)]
    pub fn generation(&self) -> f64 {
        self.inner.generation().0 as f64
    }

    #[wasm_bindgen(getter, js_name = pollIntervalMs)]
    pub fn poll_interval_ms(&self) -> f64 {
        self.inner.poll_interval().as_millis() as f64
    }

    /// Tear both backends down
    pub fn shutdown(&mut self) {
        self.inner.shutdown();
        self.flush();
    }

    // ===== State Queries =====

    /// Current state as a plain object
    pub fn snapshot(&self) -> JsValue {
        to_js(&self.inner.snapshot())
    }

    /// Recently played tracks, newest first
    #[wasm_bindgen(js_name = recentlyPlayed)]
    pub fn recently_played(&self) -> JsValue {
        to_js(&self.inner.recently_played().to_vec())
    }

    // ===== Event Listeners =====

    /// Call `callback(snapshot)` now and after every state change
    ///
    /// Returns a handle for `unsubscribe`.
    pub fn subscribe(&mut self, callback: Function) -> u32 {
        let id = self.inner.subscribe(move |snapshot| {
            if let Ok(value) = serde_wasm_bindgen::to_value(snapshot) {
                callback.call1(&JsValue::NULL, &value).ok();
            }
        });

        self.next_subscription += 1;
        self.subscriptions.push((self.next_subscription, id));
        self.next_subscription
    }

    pub fn unsubscribe(&mut self, handle: u32) -> bool {
        let Some(pos) = self.subscriptions.iter().position(|(h, _)| *h == handle) else {
            return false;
        };
        let (_, id) = self.subscriptions.remove(pos);
        self.inner.unsubscribe(id)
    }

    /// Register event callback (receives each `PlaybackEvent` object)
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, callback: Function) {
        self.on_event = Some(callback);
        self.flush();
    }

    /// Take pending events when no callback is registered
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> JsValue {
        to_js(&self.inner.drain_events())
    }

    // ===== Internal Event Emitters =====

    fn flush(&mut self) {
        let Some(ref cb) = self.on_event else {
            return;
        };
        for event in self.inner.drain_events() {
            cb.call1(&JsValue::NULL, &to_js(&event)).ok();
        }
    }
}

fn parse_track(value: JsValue) -> Result<Track, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse track: {}", e)))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn to_js_error(error: PlaybackError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn secs(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
}
