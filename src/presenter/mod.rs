//! The interviewer avatar: turn indicator, sound bars and ambient motion.

mod ambient;
mod bars;

pub use ambient::{ambient_pose, AmbientPose};
pub use bars::{base_height, SoundBars, BAR_COUNT, BAR_MAX, BAR_REST};

use crate::config::SessionConfig;
use interview_session_types::TurnStatus;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub const AVATAR_NAME: &str = "Nova";
pub const AVATAR_SUBTITLE: &str = "Your Interview Guide";

const PULSE_PERIOD: Duration = Duration::from_millis(800);

/// Which turn cue the avatar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnIndicator {
    Speaking,
    Listening,
    Dormant,
}

/// `is_speaking` wins over whatever the status says.
pub fn indicator(is_speaking: bool, status: TurnStatus) -> TurnIndicator {
    if is_speaking {
        return TurnIndicator::Speaking;
    }
    match status {
        TurnStatus::Listening => TurnIndicator::Listening,
        // A status of "speaking" without the speaking flag shows no cue.
        TurnStatus::Speaking | TurnStatus::Idle => TurnIndicator::Dormant,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Primary,
    Success,
    Muted,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorStyle {
    pub tone: Tone,
    pub pulsing: bool,
    pub pulse_period_secs: f32,
}

impl From<TurnIndicator> for IndicatorStyle {
    fn from(indicator: TurnIndicator) -> Self {
        let (tone, pulsing) = match indicator {
            TurnIndicator::Speaking => (Tone::Primary, true),
            TurnIndicator::Listening => (Tone::Success, true),
            TurnIndicator::Dormant => (Tone::Muted, false),
        };
        Self {
            tone,
            pulsing,
            pulse_period_secs: PULSE_PERIOD.as_secs_f32(),
        }
    }
}

/// The two signals the presenter reacts to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnInput {
    pub is_speaking: bool,
    pub status: TurnStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarFrame {
    pub scale: f32,
    pub height: f32,
}

/// One rendered avatar frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvatarFrame {
    pub name: &'static str,
    pub subtitle: &'static str,
    pub indicator: TurnIndicator,
    pub style: IndicatorStyle,
    pub status_label: &'static str,
    pub bars: [BarFrame; BAR_COUNT],
    pub ambient: AmbientPose,
}

impl AvatarFrame {
    fn compose(input: TurnInput, bars: &SoundBars, started: Instant, now: Instant) -> Self {
        let mut frames = [BarFrame {
            scale: BAR_REST,
            height: 0.0,
        }; BAR_COUNT];
        for (i, (frame, scale)) in frames.iter_mut().zip(bars.amplitudes(now)).enumerate() {
            *frame = BarFrame {
                scale,
                height: base_height(i) * scale,
            };
        }

        let mut frame = Self {
            name: AVATAR_NAME,
            subtitle: AVATAR_SUBTITLE,
            indicator: TurnIndicator::Dormant,
            style: TurnIndicator::Dormant.into(),
            status_label: input.status.label(),
            bars: frames,
            ambient: ambient_pose(now.saturating_duration_since(started)),
        };
        frame.apply(input);
        frame
    }

    fn apply(&mut self, input: TurnInput) {
        self.indicator = indicator(input.is_speaking, input.status);
        self.style = self.indicator.into();
        self.status_label = input.status.label();
    }
}

/// Owns the avatar frame loop.
///
/// Frames are recomputed on every interval tick and on every input change.
/// Dropping the presenter stops the loop.
pub struct TurnPresenter {
    input: watch::Sender<TurnInput>,
    frames: watch::Receiver<AvatarFrame>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl TurnPresenter {
    pub fn spawn(config: &SessionConfig) -> Self {
        let started = Instant::now();
        let (input, input_rx) = watch::channel(TurnInput::default());
        let (frames_tx, frames) = watch::channel(AvatarFrame::compose(
            TurnInput::default(),
            &SoundBars::new(config.bar_decay),
            started,
            started,
        ));
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run_frames(
            input_rx,
            frames_tx,
            cancel.child_token(),
            FrameTiming {
                started,
                interval: config.frame_interval.max(Duration::from_millis(1)),
                bar_decay: config.bar_decay,
            },
        ));

        Self {
            input,
            frames,
            cancel,
            task: Some(task),
        }
    }

    pub fn update(&self, is_speaking: bool, status: TurnStatus) {
        let next = TurnInput {
            is_speaking,
            status,
        };
        self.input.send_if_modified(|input| {
            if *input == next {
                return false;
            }
            tracing::debug!(
                "turn input: speaking={} status={}",
                next.is_speaking,
                next.status
            );
            *input = next;
            true
        });
    }

    pub fn input(&self) -> TurnInput {
        *self.input.borrow()
    }

    /// Latest frame. The indicator always reflects the latest input even if
    /// the loop has not produced a frame for it yet.
    pub fn frame(&self) -> AvatarFrame {
        let mut frame = self.frames.borrow().clone();
        frame.apply(self.input());
        frame
    }

    pub fn frames(&self) -> watch::Receiver<AvatarFrame> {
        self.frames.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for TurnPresenter {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct FrameTiming {
    started: Instant,
    interval: Duration,
    bar_decay: Duration,
}

async fn run_frames(
    mut input_rx: watch::Receiver<TurnInput>,
    frames_tx: watch::Sender<AvatarFrame>,
    cancel: CancellationToken,
    timing: FrameTiming,
) {
    let mut rng = StdRng::from_entropy();
    let mut bars = SoundBars::new(timing.bar_decay);
    let mut interval = tokio::time::interval(timing.interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = input_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let input = *input_rx.borrow_and_update();
                bars.set_speaking(input.is_speaking, Instant::now(), &mut rng);
            }
            _ = interval.tick() => {}
        }

        let input = *input_rx.borrow();
        frames_tx.send_replace(AvatarFrame::compose(
            input,
            &bars,
            timing.started,
            Instant::now(),
        ));
    }
    tracing::debug!("avatar frame loop stopped");
}
