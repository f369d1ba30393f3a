use crate::media::{MediaStream, MediaTrack};
use async_trait::async_trait;
use interview_session_types::VideoConstraints;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Failures reported by the platform when asking for a camera.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    /// The user or the platform refused access.
    #[error("camera access denied: {0}")]
    DeviceDenied(String),
    /// No capture device could be found or opened.
    #[error("no camera available")]
    Unavailable,
}

/// The platform capability for requesting a video capture device.
///
/// Implementations resolve after an arbitrary delay. The caller is
/// responsible for releasing the returned stream; dropping a pending
/// future is not a release.
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    async fn request_video(&self, constraints: &VideoConstraints) -> Result<MediaStream, CaptureError>;
}

/// A camera that exists only in memory.
///
/// It is used by the console demo and as the scriptable backend in tests:
/// latency and denial can be configured, and every stream it hands out is
/// remembered so leaked devices can be counted.
pub struct SimulatedCamera {
    label: String,
    latency: Duration,
    deny: AtomicBool,
    requests: AtomicU64,
    issued: Mutex<Vec<MediaStream>>,
}

impl Default for SimulatedCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedCamera {
    pub fn new() -> Self {
        Self {
            label: "Simulated Camera".to_string(),
            latency: Duration::ZERO,
            deny: AtomicBool::new(false),
            requests: AtomicU64::new(0),
            issued: Mutex::new(Vec::new()),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn denying(self) -> Self {
        self.set_denied(true);
        self
    }

    /// Flip permission at runtime, e.g. to model the user granting access
    /// after an earlier refusal.
    pub fn set_denied(&self, denied: bool) {
        self.deny.store(denied, Ordering::SeqCst);
    }

    /// Number of requests received, including denied ones.
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }

    /// Every stream handed out so far.
    pub fn issued_streams(&self) -> Vec<MediaStream> {
        match self.issued.lock() {
            Ok(issued) => issued.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Streams handed out that still have a running track.
    pub fn live_streams(&self) -> usize {
        self.issued_streams().iter().filter(|s| s.is_live()).count()
    }
}

#[async_trait]
impl CaptureBackend for SimulatedCamera {
    async fn request_video(&self, constraints: &VideoConstraints) -> Result<MediaStream, CaptureError> {
        let n = self.requests.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(
            "camera request #{} ({}x{}, {:?})",
            n,
            constraints.ideal_width(),
            constraints.ideal_height(),
            constraints.facing()
        );

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.deny.load(Ordering::SeqCst) {
            return Err(CaptureError::DeviceDenied(
                "permission dismissed by user".to_string(),
            ));
        }

        let track = MediaTrack::video(
            format!("sim-video-{n}"),
            self.label.clone(),
            constraints.ideal_width(),
            constraints.ideal_height(),
        );
        let stream = MediaStream::new(format!("sim-stream-{n}"), vec![track]);

        match self.issued.lock() {
            Ok(mut issued) => issued.push(stream.clone()),
            Err(poisoned) => poisoned.into_inner().push(stream.clone()),
        }
        Ok(stream)
    }
}
