//! Output volume shared by both drivers
//!
//! Level is a linear 0.0-1.0 value handed to the backends as is. Muting keeps
//! the level so unmuting restores it.

/// Volume controller
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f32,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller, clamping `level` into range
    pub fn new(level: f32) -> Self {
        Self {
            level: clamp_level(level),
            muted: false,
        }
    }

    /// Set volume level
    ///
    /// Clamps to [0, 1] (NaN becomes 0) and unmutes.
    pub fn set_level(&mut self, level: f32) {
        self.level = clamp_level(level);
        self.muted = false;
    }

    /// Stored level (0.0-1.0), regardless of mute
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Mute audio (preserves volume level)
    pub fn mute(&mut self) {
        self.muted = true;
    }

    /// Unmute audio (restores previous volume)
    pub fn unmute(&mut self) {
        self.muted = false;
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Level the drivers receive: 0 while muted
    pub fn effective(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(0.7)
    }
}

fn clamp_level(level: f32) -> f32 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}
