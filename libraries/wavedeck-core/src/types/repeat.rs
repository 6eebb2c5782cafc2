/// Repeat mode shared by the playback core and its hosts
use serde::{Deserialize, Serialize};

/// Repeat mode for playback
///
/// Serialized as `none | all | one`, the names the browser UI uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the queue ends
    #[default]
    #[serde(rename = "none", alias = "off")]
    Off,
    /// Wrap around to the start of the queue
    All,
    /// Replay the current track
    One,
}

impl RepeatMode {
    /// Next mode in the toggle cycle: none → all → one → none
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }

    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "none",
            Self::All => "all",
            Self::One => "one",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" | "off" => Some(Self::Off),
            "all" => Some(Self::All),
            "one" => Some(Self::One),
            _ => None,
        }
    }
}

impl std::fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
