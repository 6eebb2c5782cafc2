//! WASM bindings for wavedeck-playback
//!
//! Exposes the playback manager to a browser UI. The page supplies the two
//! backends as JavaScript objects and forwards their callbacks back in.

pub mod driver;
pub mod manager;
pub mod storage;

pub use driver::{JsBackend, JsDriver};
pub use manager::WasmPlaybackManager;
pub use storage::LocalStorageHistory;
