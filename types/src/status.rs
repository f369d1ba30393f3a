use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The speaker-turn phase reported by the upstream orchestrator.
///
/// On the wire this is one of `"idle"`, `"listening"` or `"speaking"`.
/// Anything else is rejected instead of being folded into a default, so a
/// new status always needs an explicit mapping decision downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnStatus {
    #[default]
    Idle,
    Listening,
    Speaking,
}

impl TurnStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnStatus::Idle => "idle",
            TurnStatus::Listening => "listening",
            TurnStatus::Speaking => "speaking",
        }
    }

    /// Human readable status text shown under the avatar.
    pub fn label(&self) -> &'static str {
        match self {
            TurnStatus::Idle => "Ready",
            TurnStatus::Listening => "Listening",
            TurnStatus::Speaking => "Speaking",
        }
    }
}

impl fmt::Display for TurnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown turn status: {0:?}")]
pub struct ParseTurnStatusError(pub String);

impl FromStr for TurnStatus {
    type Err = ParseTurnStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(TurnStatus::Idle),
            "listening" => Ok(TurnStatus::Listening),
            "speaking" => Ok(TurnStatus::Speaking),
            other => Err(ParseTurnStatusError(other.to_string())),
        }
    }
}
