use super::scroll::ScrollViewport;
use super::{RevealEngine, RevealState};
use crate::config::SessionConfig;
use crate::motion::{back_out, power2_out, Tween};
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

pub const INACTIVE_PROMPT: &str = "Click \"Start Interview\" to begin your session";

const ENTRANCE_DURATION: Duration = Duration::from_millis(400);
const ENTRANCE_SCALE_FROM: f32 = 0.95;

/// What the question box shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum QuestionFrame {
    Prompt {
        text: &'static str,
    },
    Revealing {
        text: String,
        cursor: bool,
        scroll_top: f32,
        scale: f32,
        opacity: f32,
    },
}

/// The question box: a [`RevealEngine`] plus the cosmetic motion around it.
///
/// The box follows the revealed text to the bottom whenever it changes and
/// plays a short entrance each time a reveal restarts.
pub struct QuestionPanel {
    engine: RevealEngine,
    viewport: ScrollViewport,
    scroll: Tween,
    scroll_duration: Duration,
    entrance: Option<Tween>,
    is_active: bool,
    last_shown: String,
}

impl QuestionPanel {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            engine: RevealEngine::new(config.reveal_tick),
            viewport: ScrollViewport::default(),
            scroll: Tween::settled(0.0, Instant::now()),
            scroll_duration: config.scroll_duration,
            entrance: None,
            is_active: false,
            last_shown: String::new(),
        }
    }

    pub fn with_viewport(mut self, viewport: ScrollViewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn update(&mut self, question: &str, is_active: bool) {
        self.is_active = is_active;
        if self.engine.update(question, is_active) {
            self.entrance = Some(Tween::new(
                0.0,
                1.0,
                Instant::now(),
                ENTRANCE_DURATION,
                back_out,
            ));
        }
    }

    pub fn engine(&self) -> &RevealEngine {
        &self.engine
    }

    pub fn state(&self) -> RevealState {
        self.engine.state()
    }

    pub fn frame(&mut self) -> QuestionFrame {
        if !self.is_active {
            return QuestionFrame::Prompt {
                text: INACTIVE_PROMPT,
            };
        }

        let now = Instant::now();
        let state = self.engine.state();
        if state.shown() != self.last_shown {
            self.follow(state.shown(), now);
        }

        let entrance = self.entrance.map(|t| t.value(now)).unwrap_or(1.0);
        QuestionFrame::Revealing {
            text: state.shown().to_string(),
            cursor: state.cursor_active(),
            scroll_top: self.scroll.value(now),
            scale: ENTRANCE_SCALE_FROM + (1.0 - ENTRANCE_SCALE_FROM) * entrance,
            opacity: entrance.clamp(0.0, 1.0),
        }
    }

    fn follow(&mut self, shown: &str, now: Instant) {
        self.last_shown = shown.to_string();
        let bottom = self.viewport.bottom(shown);
        if (bottom - self.scroll.target()).abs() > f32::EPSILON {
            self.scroll = Tween::new(
                self.scroll.value(now),
                bottom,
                now,
                self.scroll_duration,
                power2_out,
            );
        }
    }
}
