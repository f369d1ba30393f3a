//! The practice-session screen: avatar, question box, self-view and menu.

use crate::capture::{CameraView, CaptureDeviceManager, VideoSink};
use crate::config::SessionConfig;
use crate::menu::{AccountMenu, MenuEntry};
use crate::presenter::{AvatarFrame, TurnPresenter};
use crate::reveal::{QuestionFrame, QuestionPanel, RevealState};
use futures::stream::BoxStream;
use interview_session_types::SessionSignals;
use interview_session_utils::CaptureBackend;
use serde::Serialize;
use std::sync::Arc;

/// The self-view tile with its name badge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraTile {
    pub view: CameraView,
    pub name_badge: String,
}

/// Everything the screen shows at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionFrame {
    pub avatar: AvatarFrame,
    pub question: QuestionFrame,
    pub camera: CameraTile,
    pub menu: Vec<MenuEntry>,
}

/// Composes the capture manager, turn presenter and question panel and
/// routes each inbound signal to the component that owns it.
///
/// Must be created inside a tokio runtime. Dropping the shell releases the
/// camera and stops every timer.
pub struct SessionShell {
    capture: CaptureDeviceManager,
    presenter: TurnPresenter,
    panel: QuestionPanel,
    menu: AccountMenu,
    signals: Option<SessionSignals>,
}

impl SessionShell {
    pub fn new(
        config: SessionConfig,
        backend: Arc<dyn CaptureBackend>,
        sink: Arc<dyn VideoSink>,
        menu: AccountMenu,
    ) -> Self {
        Self {
            capture: CaptureDeviceManager::new(backend, sink, config.video.clone()),
            presenter: TurnPresenter::spawn(&config),
            panel: QuestionPanel::new(&config),
            menu,
            signals: None,
        }
    }

    /// Apply a new snapshot of the session signals.
    ///
    /// Only fields that changed since the last snapshot reach their
    /// component, so re-applying the same snapshot never restarts a reveal
    /// or retries a failed camera.
    pub fn apply(&mut self, signals: SessionSignals) {
        let previous = self.signals.take();
        let first = previous.is_none();
        let previous = previous.unwrap_or_default();

        if first || previous.is_camera_on != signals.is_camera_on {
            self.capture.set_enabled(signals.is_camera_on);
        }
        if first || previous.question != signals.question || previous.is_active != signals.is_active
        {
            self.panel.update(&signals.question, signals.is_active);
        }
        self.presenter.update(signals.is_speaking, signals.status);

        self.signals = Some(signals);
    }

    pub fn frame(&mut self) -> SessionFrame {
        let signals = self.signals.clone().unwrap_or_default();
        SessionFrame {
            avatar: self.presenter.frame(),
            question: self.panel.frame(),
            camera: CameraTile {
                view: self.capture.view(signals.is_recording),
                name_badge: signals.display_name().to_string(),
            },
            menu: self.menu.entries(),
        }
    }

    pub fn capture(&self) -> &CaptureDeviceManager {
        &self.capture
    }

    pub fn menu_mut(&mut self) -> &mut AccountMenu {
        &mut self.menu
    }

    pub fn reveal_state(&self) -> RevealState {
        self.panel.state()
    }

    /// Reveal states published after this call.
    pub fn reveal_updates(&self) -> BoxStream<'static, RevealState> {
        self.panel.engine().updates()
    }
}
