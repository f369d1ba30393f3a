use serde::{Deserialize, Serialize};

/// Which physical side of the device the camera should face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front-facing, towards the person using the device.
    #[default]
    User,
    Environment,
}

/// Hints passed to the platform when requesting a capture device.
///
/// The resolution is an *ideal*, not a hard requirement: the platform may
/// hand back whatever it can do closest to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoConstraints {
    ideal_width: u32,
    ideal_height: u32,
    facing: FacingMode,
    audio: bool,
}

impl Default for VideoConstraints {
    fn default() -> Self {
        Self {
            ideal_width: 1280,
            ideal_height: 720,
            facing: FacingMode::User,
            audio: false,
        }
    }
}

impl VideoConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.ideal_width = width;
        self.ideal_height = height;
        self
    }

    pub fn with_facing(mut self, facing: FacingMode) -> Self {
        self.facing = facing;
        self
    }

    pub fn ideal_width(&self) -> u32 {
        self.ideal_width
    }

    pub fn ideal_height(&self) -> u32 {
        self.ideal_height
    }

    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    /// Always false: the capture layer only ever asks for video.
    pub fn audio(&self) -> bool {
        self.audio
    }
}

/// Lifecycle phase of a capture session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", content = "message", rename_all = "lowercase")]
pub enum CapturePhase {
    #[default]
    Idle,
    Acquiring,
    Live,
    Error(String),
}

impl CapturePhase {
    /// True while a session exists, i.e. a device is held or being requested.
    pub fn holds_session(&self) -> bool {
        matches!(self, CapturePhase::Acquiring | CapturePhase::Live)
    }

    /// True once no acquisition is in flight.
    pub fn is_settled(&self) -> bool {
        !matches!(self, CapturePhase::Acquiring)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            CapturePhase::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_constraints_ask_for_front_facing_720p_without_audio() {
        let constraints = VideoConstraints::default();
        assert_eq!(constraints.ideal_width(), 1280);
        assert_eq!(constraints.ideal_height(), 720);
        assert_eq!(constraints.facing(), FacingMode::User);
        assert!(!constraints.audio());
    }

    #[test]
    fn builder_overrides_resolution() {
        let constraints = VideoConstraints::new()
            .with_resolution(640, 480)
            .with_facing(FacingMode::Environment);
        assert_eq!(constraints.ideal_width(), 640);
        assert_eq!(constraints.ideal_height(), 480);
        assert_eq!(constraints.facing(), FacingMode::Environment);
    }

    #[test]
    fn phase_helpers() {
        assert!(CapturePhase::Acquiring.holds_session());
        assert!(CapturePhase::Live.holds_session());
        assert!(!CapturePhase::Error("denied".into()).holds_session());
        assert!(!CapturePhase::Acquiring.is_settled());
        assert_eq!(
            CapturePhase::Error("denied".into()).error_message(),
            Some("denied")
        );
    }

    #[test]
    fn phase_serializes_with_message() {
        let json = serde_json::to_value(CapturePhase::Error("nope".into())).unwrap();
        assert_eq!(json["phase"], "error");
        assert_eq!(json["message"], "nope");
    }
}
