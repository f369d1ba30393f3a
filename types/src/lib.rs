pub mod capture;
pub mod signals;
pub mod status;

pub use capture::{CapturePhase, FacingMode, VideoConstraints};
pub use signals::{SessionSignals, UserProfile};
pub use status::{ParseTurnStatusError, TurnStatus};
