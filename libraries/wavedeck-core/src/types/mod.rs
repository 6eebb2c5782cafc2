mod repeat;
mod track;

pub use repeat::RepeatMode;
pub use track::{duration_secs, Track, TrackKind};
