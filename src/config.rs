use interview_session_types::VideoConstraints;
use std::time::Duration;

/// Timing and device settings shared by the session components.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Interval between revealed characters of a question.
    ///
    /// Total reveal time grows linearly with the question length; there is
    /// no cap for very long questions.
    pub reveal_tick: Duration,
    /// Cadence of the avatar frame loop.
    pub frame_interval: Duration,
    /// How long the sound bars take to settle once speaking stops.
    pub bar_decay: Duration,
    /// Duration of the scroll-to-bottom tween on the question panel.
    pub scroll_duration: Duration,
    pub video: VideoConstraints,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reveal_tick: Duration::from_millis(30),
            frame_interval: Duration::from_millis(50),
            bar_decay: Duration::from_millis(300),
            scroll_duration: Duration::from_millis(300),
            video: VideoConstraints::default(),
        }
    }
}

impl SessionConfig {
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::new()
    }
}

pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl Default for SessionConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
        }
    }

    pub fn with_reveal_tick(mut self, tick: Duration) -> Self {
        self.config.reveal_tick = tick;
        self
    }

    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.config.frame_interval = interval;
        self
    }

    pub fn with_bar_decay(mut self, decay: Duration) -> Self {
        self.config.bar_decay = decay;
        self
    }

    pub fn with_scroll_duration(mut self, duration: Duration) -> Self {
        self.config.scroll_duration = duration;
        self
    }

    pub fn with_video(mut self, video: VideoConstraints) -> Self {
        self.config.video = video;
        self
    }

    pub fn build(self) -> SessionConfig {
        self.config
    }
}
