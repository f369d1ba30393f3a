//! Environment configuration for the console session.
//!
//! Settings come from the process environment, with a `.env` file in the
//! working directory loaded first when present.

use interview_session::types::VideoConstraints;
use interview_session::SessionConfig;
use std::env;
use std::time::Duration;
use tracing::Level;

#[derive(Debug, Clone)]
pub struct Config {
    pub reveal_tick: Duration,
    pub frame_interval: Duration,
    pub camera_width: u32,
    pub camera_height: u32,
    pub log_level: Level,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("Invalid log level provided for RUST_LOG: {0}")]
    InvalidLogLevel(String),
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    // *   `REVEAL_TICK_MS`: (Optional) Delay between revealed characters. Defaults to 30.
    // *   `FRAME_INTERVAL_MS`: (Optional) Avatar frame cadence. Defaults to 50.
    // *   `CAMERA_WIDTH` / `CAMERA_HEIGHT`: (Optional) Requested resolution. Defaults to 1280x720.
    // *   `RUST_LOG`: (Optional) The logging level. Defaults to "INFO".
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = SessionConfig::default();
        let millis = |name: &'static str, default: Duration| -> Result<Duration, ConfigError> {
            match lookup(name) {
                Some(value) => value
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|ms| *ms > 0)
                    .map(Duration::from_millis)
                    .ok_or(ConfigError::InvalidNumber { name, value }),
                None => Ok(default),
            }
        };
        let pixels = |name: &'static str, default: u32| -> Result<u32, ConfigError> {
            match lookup(name) {
                Some(value) => value
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|px| *px > 0)
                    .ok_or(ConfigError::InvalidNumber { name, value }),
                None => Ok(default),
            }
        };

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str
            .parse::<Level>()
            .map_err(|_| ConfigError::InvalidLogLevel(log_level_str))?;

        Ok(Self {
            reveal_tick: millis("REVEAL_TICK_MS", defaults.reveal_tick)?,
            frame_interval: millis("FRAME_INTERVAL_MS", defaults.frame_interval)?,
            camera_width: pixels("CAMERA_WIDTH", defaults.video.ideal_width())?,
            camera_height: pixels("CAMERA_HEIGHT", defaults.video.ideal_height())?,
            log_level,
        })
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::builder()
            .with_reveal_tick(self.reveal_tick)
            .with_frame_interval(self.frame_interval)
            .with_video(VideoConstraints::new().with_resolution(self.camera_width, self.camera_height))
            .build()
    }
}
