//! Error types for playback management

use crate::driver::DriverKind;
use thiserror::Error;

/// Playback errors
///
/// None of these escape the control surface of `PlaybackManager`: they are
/// turned into `PlaybackEvent::Error` notifications and a well-defined
/// paused/idle state.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Queue is empty
    #[error("Queue is empty")]
    QueueEmpty,

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// A backend could not load or play a resource
    #[error("{kind} driver error: {message}")]
    Driver {
        /// Backend that failed
        kind: DriverKind,
        /// Backend message
        message: String,
    },

    /// Recently-played history could not be loaded or saved
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PlaybackError {
    /// Create a driver error
    pub fn driver(kind: DriverKind, message: impl Into<String>) -> Self {
        Self::Driver {
            kind,
            message: message.into(),
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
