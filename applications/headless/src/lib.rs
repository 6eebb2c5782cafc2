//! Wavedeck Headless
//!
//! Runs the Wavedeck playback core outside a browser: simulated backends stand
//! in for the embedded video player and the audio element, and a tokio timer
//! stands in for the page's event loop.
//!
//! This library exposes the runner's components for testing purposes.

pub mod config;
pub mod driver;
pub mod error;
pub mod queue_file;
pub mod session;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use driver::{SimulatedBackend, SimulatedDriver};
pub use error::{AppError, Result};
pub use queue_file::load_queue;
pub use session::{Session, SessionOutcome, SessionSummary};
