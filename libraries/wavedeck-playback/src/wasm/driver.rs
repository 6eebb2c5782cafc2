//! JavaScript-backed drivers
//!
//! A backend object on the JS side must expose:
//!
//! ```text
//! load(resource: string, generation: number)
//! play()  pause()  stop()
//! seek(seconds: number)
//! setVolume(level: number)          // 0.0-1.0
//! getCurrentTime(generation: number): number | undefined
//! ```
//!
//! Any method may throw; a throw becomes a driver error. `getCurrentTime`
//! returns `undefined` when the answer needs a round trip (the embedded video
//! player), in which case the page later calls `handleDriverEvent` with a
//! `timeUpdate` for that generation.

use crate::driver::{DriverKind, Generation, PlaybackDriver, TimeQuery};
use crate::error::{PlaybackError, Result};
use std::time::Duration;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// Backend object supplied by the page
    pub type JsBackend;

    #[wasm_bindgen(method, catch)]
    fn load(this: &JsBackend, resource: &str, generation: f64) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn play(this: &JsBackend) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn pause(this: &JsBackend) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn stop(this: &JsBackend) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn seek(this: &JsBackend, seconds: f64) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = setVolume)]
    fn set_volume(this: &JsBackend, level: f32) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = getCurrentTime)]
    fn get_current_time(this: &JsBackend, generation: f64) -> JsValue;
}

/// [`PlaybackDriver`] over a JS backend object
pub struct JsDriver {
    kind: DriverKind,
    backend: JsBackend,
}

impl JsDriver {
    pub fn new(kind: DriverKind, backend: JsBackend) -> Self {
        Self { kind, backend }
    }

    fn check(&self, result: std::result::Result<(), JsValue>) -> Result<()> {
        result.map_err(|err| PlaybackError::driver(self.kind, js_message(&err)))
    }
}

impl PlaybackDriver for JsDriver {
    fn kind(&self) -> DriverKind {
        self.kind
    }

    fn load(&mut self, resource: &str, generation: Generation) -> Result<()> {
        self.check(self.backend.load(resource, generation.0 as f64))
    }

    fn play(&mut self) -> Result<()> {
        self.check(self.backend.play())
    }

    fn pause(&mut self) -> Result<()> {
        self.check(self.backend.pause())
    }

    fn stop(&mut self) -> Result<()> {
        self.check(self.backend.stop())
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.check(self.backend.seek(position.as_secs_f64()))
    }

    fn set_volume(&mut self, level: f32) -> Result<()> {
        self.check(self.backend.set_volume(level))
    }

    fn current_time(&mut self, generation: Generation) -> TimeQuery {
        match self.backend.get_current_time(generation.0 as f64).as_f64() {
            Some(secs) => TimeQuery::Ready(Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)),
            None => TimeQuery::Pending,
        }
    }
}

/// Best-effort text for a thrown JS value
pub(crate) fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", value))
}
