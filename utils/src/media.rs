use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A single video track of a captured stream.
///
/// Clones share the same stopped flag, so a clone kept by a test or a sink
/// observes a `stop()` issued through any other clone.
#[derive(Debug, Clone)]
pub struct MediaTrack {
    id: String,
    label: String,
    width: u32,
    height: u32,
    stopped: Arc<AtomicBool>,
}

impl MediaTrack {
    pub fn video(id: impl Into<String>, label: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            width,
            height,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Stops the track. Stopping twice is a no-op.
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            tracing::debug!("stopped track {} ({})", self.id, self.label);
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// A stream handed out by a capture backend.
#[derive(Debug, Clone)]
pub struct MediaStream {
    id: String,
    tracks: Vec<MediaTrack>,
}

impl MediaStream {
    pub fn new(id: impl Into<String>, tracks: Vec<MediaTrack>) -> Self {
        Self {
            id: id.into(),
            tracks,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracks(&self) -> &[MediaTrack] {
        &self.tracks
    }

    /// Stops every track of the stream, releasing the device.
    pub fn stop_all(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }

    /// A stream is live while at least one of its tracks is still running.
    pub fn is_live(&self) -> bool {
        self.tracks.iter().any(|t| !t.is_stopped())
    }
}
