/// Headless runner configuration
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use wavedeck_playback::PlaybackConfig;

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "wavedeck.toml";

/// Fastest accepted simulation speed
pub const MAX_SPEED: f64 = 1000.0;

/// Longest accepted simulation step, in milliseconds
pub const MAX_TICK_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Where the recently played list is stored
    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,

    /// Simulation step in wall-clock milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Simulated playback seconds per wall-clock second
    #[serde(default = "default_speed")]
    pub speed: f64,

    /// Length given to tracks whose duration is unknown until loaded
    #[serde(default = "default_unknown_length_secs")]
    pub unknown_length_secs: u64,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// Without `path`, `wavedeck.toml` is used when present. Environment
    /// variables prefixed with `WAVEDECK_` override file values; nested keys
    /// use `__` (e.g. `WAVEDECK_PLAYBACK__VOLUME=0.4`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path).required(true)),
            None => settings.add_source(config::File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false)),
        };

        settings = settings.add_source(
            config::Environment::with_prefix("WAVEDECK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 || self.tick_ms > MAX_TICK_MS {
            return Err(AppError::Config(format!(
                "tick_ms must be within 1-{}, got {}",
                MAX_TICK_MS, self.tick_ms
            )));
        }

        if !self.speed.is_finite() || self.speed <= 0.0 || self.speed > MAX_SPEED {
            return Err(AppError::Config(format!(
                "speed must be a positive number up to {}, got {}",
                MAX_SPEED, self.speed
            )));
        }

        if !(0.0..=1.0).contains(&self.playback.volume) {
            return Err(AppError::Config(format!(
                "playback.volume must be within 0.0-1.0, got {}",
                self.playback.volume
            )));
        }

        if self.playback.history_size == 0 {
            return Err(AppError::Config(
                "playback.history_size must be greater than 0".to_string(),
            ));
        }

        if self.unknown_length_secs == 0 {
            return Err(AppError::Config(
                "unknown_length_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Wall-clock time between simulation steps
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Simulated playback time covered by one step
    pub fn step(&self) -> Duration {
        self.tick().mul_f64(self.speed)
    }

    /// Wall-clock time between progress polls
    pub fn poll_period(&self) -> Duration {
        self.playback.poll_interval().div_f64(self.speed)
    }

    pub fn unknown_length(&self) -> Duration {
        Duration::from_secs(self.unknown_length_secs)
    }
}

// Default values
fn default_history_path() -> PathBuf {
    PathBuf::from("./data/recently-played.json")
}

fn default_tick_ms() -> u64 {
    100
}

fn default_speed() -> f64 {
    1.0
}

fn default_unknown_length_secs() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            history_path: default_history_path(),
            tick_ms: default_tick_ms(),
            speed: default_speed(),
            unknown_length_secs: default_unknown_length_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wavedeck_core::RepeatMode;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.step(), Duration::from_millis(100));
        assert_eq!(config.poll_period(), Duration::from_secs(1));
    }

    #[test]
    fn file_values_fill_nested_playback_config() {
        let file = write_config(
            r#"
            tick_ms = 50
            speed = 4.0
            history_path = "/tmp/history.json"

            [playback]
            repeat = "all"
            volume = 0.4
            "#,
        );

        let config = AppConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.tick_ms, 50);
        assert_eq!(config.speed, 4.0);
        assert_eq!(config.history_path, PathBuf::from("/tmp/history.json"));
        assert_eq!(config.playback.repeat, RepeatMode::All);
        assert_eq!(config.playback.volume, 0.4);
        assert_eq!(config.playback.history_size, 50);
        assert_eq!(config.step(), Duration::from_millis(200));
        assert_eq!(config.poll_period(), Duration::from_millis(250));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/wavedeck.toml")));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn validate_bounds_speed() {
        let config = AppConfig {
            speed: MAX_SPEED,
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
        assert!(!config.poll_period().is_zero());

        for speed in [MAX_SPEED * 2.0, 1e300, f64::INFINITY] {
            let config = AppConfig {
                speed,
                ..AppConfig::default()
            };
            assert!(matches!(config.validate(), Err(AppError::Config(_))));
        }

        let config = AppConfig {
            tick_ms: MAX_TICK_MS + 1,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let config = AppConfig {
            speed: 0.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.playback.volume = 1.5;
        assert!(config.validate().is_err());

        let config = AppConfig {
            tick_ms: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
