pub mod capture;
pub mod config;
pub mod menu;
pub mod motion;
pub mod presenter;
pub mod reveal;
pub mod shell;

pub use interview_session_types as types;
pub use interview_session_utils as utils;

pub use capture::{CameraView, CaptureDeviceManager, PreviewSurface, VideoSink};
pub use config::{SessionConfig, SessionConfigBuilder};
pub use menu::{AccountMenu, MenuEntry};
pub use presenter::{indicator, AvatarFrame, TurnIndicator, TurnPresenter};
pub use reveal::{QuestionFrame, QuestionPanel, RevealEngine, RevealState};
pub use shell::{CameraTile, SessionFrame, SessionShell};
