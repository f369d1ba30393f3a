use crate::status::TurnStatus;
use serde::{Deserialize, Serialize};

const DEFAULT_USER_NAME: &str = "You";

/// Session-wide inputs supplied by whatever orchestrates the interview.
///
/// Field names follow the camelCase props used by the host UI so a JSON
/// snapshot from the host can be deserialized directly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSignals {
    pub is_active: bool,
    pub is_speaking: bool,
    pub status: TurnStatus,
    pub question: String,
    pub is_camera_on: bool,
    pub is_recording: bool,
    pub user_name: Option<String>,
}

impl SessionSignals {
    /// Name shown on the self-view badge.
    pub fn display_name(&self) -> &str {
        self.user_name.as_deref().unwrap_or(DEFAULT_USER_NAME)
    }
}

/// The signed-in account, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_you() {
        let mut signals = SessionSignals::default();
        assert_eq!(signals.display_name(), "You");
        signals.user_name = Some("Ada".into());
        assert_eq!(signals.display_name(), "Ada");
    }

    #[test]
    fn deserializes_host_props() {
        let json = r#"{
            "isActive": true,
            "isSpeaking": false,
            "status": "listening",
            "question": "Tell me about yourself.",
            "isCameraOn": true
        }"#;
        let signals: SessionSignals = serde_json::from_str(json).unwrap();
        assert!(signals.is_active);
        assert_eq!(signals.status, TurnStatus::Listening);
        assert_eq!(signals.question, "Tell me about yourself.");
        assert!(signals.is_camera_on);
        assert!(!signals.is_recording);
        assert_eq!(signals.user_name, None);
    }
}
