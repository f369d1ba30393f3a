pub mod device;
pub mod media;

pub use device::{CaptureBackend, CaptureError, SimulatedCamera};
pub use media::{MediaStream, MediaTrack};
