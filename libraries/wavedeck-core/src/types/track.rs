/// Track domain type
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playable unit of audio
///
/// A track is either backed by a remote video identifier or by a local audio
/// resource; [`TrackKind`] carries exactly one of the two. The `id` is stable
/// across queue operations but is not unique inside a queue: the same track may
/// be enqueued twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Track identifier
    pub id: String,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Artwork URL (display only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    /// Track length, `Duration::ZERO` until known
    ///
    /// Serialized as fractional seconds.
    #[serde(default, with = "duration_secs")]
    pub duration: Duration,

    /// Backend discriminator and its resource locator
    #[serde(flatten)]
    pub kind: TrackKind,
}

/// Which backend plays a track
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum TrackKind {
    /// Played by the embedded video player
    Remote {
        /// External video identifier
        video_id: String,
    },

    /// Played by the local audio element
    Local {
        /// Direct audio resource locator
        audio_url: String,
    },
}

impl Track {
    /// Create a track backed by a remote video identifier
    pub fn remote(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        video_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            thumbnail: None,
            duration: Duration::ZERO,
            kind: TrackKind::Remote {
                video_id: video_id.into(),
            },
        }
    }

    /// Create a track backed by a local audio resource
    pub fn local(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        audio_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            thumbnail: None,
            duration: Duration::ZERO,
            kind: TrackKind::Local {
                audio_url: audio_url.into(),
            },
        }
    }

    /// Set a pre-known duration
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the artwork URL
    #[must_use]
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// Duration if the track carries one
    pub fn known_duration(&self) -> Option<Duration> {
        (!self.duration.is_zero()).then_some(self.duration)
    }

    /// Resource handed to the backend: the video id or the audio URL
    pub fn resource(&self) -> &str {
        match &self.kind {
            TrackKind::Remote { video_id } => video_id,
            TrackKind::Local { audio_url } => audio_url,
        }
    }

    /// Whether the embedded video player plays this track
    pub fn is_remote(&self) -> bool {
        matches!(self.kind, TrackKind::Remote { .. })
    }
}

/// Serde adapter: `Duration` as fractional seconds
///
/// Negative or non-finite inputs deserialize as an unknown duration. Use
/// with `#[serde(with = "wavedeck_core::types::duration_secs")]`.
pub mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO))
    }
}
