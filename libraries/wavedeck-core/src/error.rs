/// Core error types for Wavedeck
use thiserror::Error;

/// Result type alias using `WavedeckError`
pub type Result<T> = std::result::Result<T, WavedeckError>;

/// Core error type for Wavedeck
#[derive(Error, Debug)]
pub enum WavedeckError {
    /// Search/metadata lookup failed
    #[error("Resolution error for {identifier}: {message}")]
    Resolution {
        /// Identifier that was being resolved
        identifier: String,
        /// Provider message
        message: String,
    },

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Track not found
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// Playlist not found
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    /// Caller is not signed in (handled by the UI layer, never by playback)
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Duplicate entry
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl WavedeckError {
    /// Create a resolution error
    pub fn resolution(identifier: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Resolution {
            identifier: identifier.into(),
            message: msg.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_error_names_identifier() {
        let err = WavedeckError::resolution("abc123", "quota exceeded");
        assert_eq!(
            err.to_string(),
            "Resolution error for abc123: quota exceeded"
        );
    }

    #[test]
    fn not_found_formats_entity() {
        let err = WavedeckError::not_found("Playlist", "p1");
        assert_eq!(err.to_string(), "Playlist not found: p1");
    }
}
