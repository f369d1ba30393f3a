//! Ownership of the local camera.
//!
//! [`CaptureDeviceManager`] holds at most one live stream at a time. Every
//! acquisition carries the generation it was started under; when it
//! resolves after the camera was switched off (or switched off and on
//! again) the result is stale, its stream is stopped on the spot and nothing
//! is bound.

mod sink;

pub use sink::{PreviewSurface, VideoSink};

#[cfg(test)]
pub(crate) use sink::MockVideoSink;

use interview_session_types::{CapturePhase, VideoConstraints};
use interview_session_utils::{CaptureBackend, CaptureError, MediaStream};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

pub const DENIED_MESSAGE: &str = "Camera access denied. Please enable camera permissions.";
pub const PREVIEW_FAILED_MESSAGE: &str = "Unable to start the camera preview.";
pub const PLACEHOLDER_CAPTION: &str = "Camera is off";
pub const LOADING_CAPTION: &str = "Initializing camera...";
pub const QUALITY_BADGE: &str = "HD";

struct CaptureSession {
    generation: u64,
    phase: CapturePhase,
    device: Option<MediaStream>,
}

struct Shared {
    session: Mutex<CaptureSession>,
    phase_tx: watch::Sender<CapturePhase>,
    sink: Arc<dyn VideoSink>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, CaptureSession> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn enter(&self, session: &mut CaptureSession, phase: CapturePhase) {
        tracing::debug!(
            "capture generation {}: {:?} -> {:?}",
            session.generation,
            session.phase,
            phase
        );
        session.phase = phase.clone();
        self.phase_tx.send_replace(phase);
    }

    /// Stop every track of the held device and clear the sink.
    fn release(&self, session: &mut CaptureSession) {
        if let Some(stream) = session.device.take() {
            stream.stop_all();
            self.sink.detach();
            tracing::info!("released camera stream {}", stream.id());
        }
    }

    /// Apply the outcome of an acquisition started under `generation`.
    fn complete(&self, generation: u64, result: Result<MediaStream, CaptureError>) {
        let mut session = self.lock();

        if session.generation != generation {
            drop(session);
            // Superseded by a disable or a newer request: never bind it.
            if let Ok(stream) = result {
                stream.stop_all();
            }
            tracing::debug!("discarding stale camera acquisition (generation {generation})");
            return;
        }

        match result {
            Ok(stream) => match self.sink.attach(&stream) {
                Ok(()) => {
                    tracing::info!("camera stream {} is live", stream.id());
                    session.device = Some(stream);
                    self.enter(&mut session, CapturePhase::Live);
                }
                Err(e) => {
                    tracing::error!("failed to bind camera stream {}: {:#}", stream.id(), e);
                    stream.stop_all();
                    self.enter(
                        &mut session,
                        CapturePhase::Error(PREVIEW_FAILED_MESSAGE.to_string()),
                    );
                }
            },
            Err(e) => {
                tracing::warn!("camera access error: {}", e);
                self.enter(&mut session, CapturePhase::Error(DENIED_MESSAGE.to_string()));
            }
        }
    }
}

/// Acquires and releases the camera in response to an enable signal.
///
/// Acquisition runs on a spawned task, so [`set_enabled`] must be called
/// from within a tokio runtime. Dropping the manager releases the device.
///
/// [`set_enabled`]: CaptureDeviceManager::set_enabled
pub struct CaptureDeviceManager {
    shared: Arc<Shared>,
    backend: Arc<dyn CaptureBackend>,
    constraints: VideoConstraints,
}

impl CaptureDeviceManager {
    pub fn new(
        backend: Arc<dyn CaptureBackend>,
        sink: Arc<dyn VideoSink>,
        constraints: VideoConstraints,
    ) -> Self {
        let (phase_tx, _) = watch::channel(CapturePhase::Idle);
        Self {
            shared: Arc::new(Shared {
                session: Mutex::new(CaptureSession {
                    generation: 0,
                    phase: CapturePhase::Idle,
                    device: None,
                }),
                phase_tx,
                sink,
            }),
            backend,
            constraints,
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        if enabled {
            self.enable();
        } else {
            self.disable();
        }
    }

    fn enable(&self) {
        let generation = {
            let mut session = self.shared.lock();
            if session.phase.holds_session() {
                return;
            }
            // Idle, or retrying after an error.
            session.generation += 1;
            self.shared.enter(&mut session, CapturePhase::Acquiring);
            session.generation
        };

        let shared = Arc::clone(&self.shared);
        let backend = Arc::clone(&self.backend);
        let constraints = self.constraints.clone();
        tokio::spawn(async move {
            let result = backend.request_video(&constraints).await;
            shared.complete(generation, result);
        });
    }

    fn disable(&self) {
        let mut session = self.shared.lock();
        let phase = session.phase.clone();
        match phase {
            // An error stays up until the next enable attempt.
            CapturePhase::Idle | CapturePhase::Error(_) => {}
            CapturePhase::Acquiring | CapturePhase::Live => {
                session.generation += 1;
                self.shared.release(&mut session);
                self.shared.enter(&mut session, CapturePhase::Idle);
            }
        }
    }

    pub fn phase(&self) -> CapturePhase {
        self.shared.lock().phase.clone()
    }

    /// Id of the stream currently held, if live.
    pub fn stream_id(&self) -> Option<String> {
        self.shared
            .lock()
            .device
            .as_ref()
            .map(|stream| stream.id().to_string())
    }

    pub fn phase_updates(&self) -> watch::Receiver<CapturePhase> {
        self.shared.phase_tx.subscribe()
    }

    /// Wait until no acquisition is in flight and return the phase.
    pub async fn await_settled(&self) -> CapturePhase {
        let mut rx = self.phase_updates();
        let settled = rx
            .wait_for(CapturePhase::is_settled)
            .await
            .map(|phase| (*phase).clone());
        match settled {
            Ok(phase) => phase,
            Err(_) => self.phase(),
        }
    }

    /// The tile to draw for the current phase.
    pub fn view(&self, is_recording: bool) -> CameraView {
        let session = self.shared.lock();
        CameraView::for_phase(&session.phase, session.device.as_ref(), is_recording)
    }
}

impl Drop for CaptureDeviceManager {
    fn drop(&mut self) {
        let mut session = self.shared.lock();
        session.generation += 1;
        self.shared.release(&mut session);
        if session.phase != CapturePhase::Idle {
            self.shared.enter(&mut session, CapturePhase::Idle);
        }
    }
}

/// What the self-view tile shows. Exactly one variant at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CameraView {
    Placeholder {
        caption: &'static str,
    },
    Loading {
        caption: &'static str,
    },
    Live {
        stream_id: String,
        mirrored: bool,
        recording: bool,
        quality: &'static str,
    },
    Error {
        message: String,
    },
}

impl CameraView {
    fn for_phase(phase: &CapturePhase, device: Option<&MediaStream>, is_recording: bool) -> Self {
        match phase {
            CapturePhase::Idle => CameraView::Placeholder {
                caption: PLACEHOLDER_CAPTION,
            },
            CapturePhase::Acquiring => CameraView::Loading {
                caption: LOADING_CAPTION,
            },
            CapturePhase::Live => CameraView::Live {
                stream_id: device.map(|s| s.id().to_string()).unwrap_or_default(),
                mirrored: true,
                recording: is_recording,
                quality: QUALITY_BADGE,
            },
            CapturePhase::Error(message) => CameraView::Error {
                message: message.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_session_utils::SimulatedCamera;
    use proptest::prelude::*;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn manager(camera: &Arc<SimulatedCamera>, sink: Arc<dyn VideoSink>) -> CaptureDeviceManager {
        CaptureDeviceManager::new(camera.clone(), sink, VideoConstraints::default())
    }

    #[tokio::test(start_paused = true)]
    async fn enable_binds_the_stream_once() {
        // --- Arrange ---
        let camera = Arc::new(SimulatedCamera::new().with_latency(ms(50)));
        let mut sink = MockVideoSink::new();
        sink.expect_attach()
            .withf(|stream| stream.id() == "sim-stream-1")
            .times(1)
            .returning(|_| Ok(()));
        sink.expect_detach().times(1).return_const(());
        let manager = manager(&camera, Arc::new(sink));

        // --- Act ---
        manager.set_enabled(true);
        assert_eq!(manager.phase(), CapturePhase::Acquiring);
        // A second enable while acquiring must not issue another request.
        manager.set_enabled(true);
        let phase = manager.await_settled().await;

        // --- Assert ---
        assert_eq!(phase, CapturePhase::Live);
        assert_eq!(camera.requests(), 1);
        assert_eq!(manager.stream_id().as_deref(), Some("sim-stream-1"));
    }

    #[tokio::test(start_paused = true)]
    async fn disabling_mid_acquisition_discards_the_late_stream() {
        let camera = Arc::new(SimulatedCamera::new().with_latency(ms(100)));
        let mut sink = MockVideoSink::new();
        sink.expect_attach().never();
        sink.expect_detach().never();
        let manager = manager(&camera, Arc::new(sink));

        manager.set_enabled(true);
        tokio::time::sleep(ms(10)).await;
        manager.set_enabled(false);
        assert_eq!(manager.phase(), CapturePhase::Idle);

        // Let the superseded request resolve.
        tokio::time::sleep(ms(200)).await;

        assert_eq!(manager.phase(), CapturePhase::Idle);
        assert_eq!(manager.stream_id(), None);
        assert_eq!(camera.issued_streams().len(), 1);
        assert_eq!(camera.live_streams(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn off_then_on_while_acquiring_binds_only_the_newest_stream() {
        let camera = Arc::new(SimulatedCamera::new().with_latency(ms(100)));
        let surface = Arc::new(PreviewSurface::new());
        let manager = manager(&camera, surface.clone());

        manager.set_enabled(true);
        tokio::time::sleep(ms(40)).await;
        manager.set_enabled(false);
        manager.set_enabled(true);
        let phase = manager.await_settled().await;
        // Make sure the first request has resolved too.
        tokio::time::sleep(ms(200)).await;

        assert_eq!(phase, CapturePhase::Live);
        assert_eq!(manager.phase(), CapturePhase::Live);
        assert_eq!(surface.bound_stream().as_deref(), Some("sim-stream-2"));
        assert_eq!(surface.attach_count(), 1);
        assert_eq!(camera.live_streams(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_while_live_stops_every_track() {
        let camera = Arc::new(SimulatedCamera::new());
        let surface = Arc::new(PreviewSurface::new());
        let manager = manager(&camera, surface.clone());

        manager.set_enabled(true);
        assert_eq!(manager.await_settled().await, CapturePhase::Live);
        let streams = camera.issued_streams();
        assert_eq!(streams.len(), 1);

        drop(manager);

        assert!(streams[0].tracks().iter().all(|t| t.is_stopped()));
        assert_eq!(camera.live_streams(), 0);
        assert_eq!(surface.bound_stream(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_while_acquiring_releases_the_late_stream() {
        let camera = Arc::new(SimulatedCamera::new().with_latency(ms(100)));
        let manager = manager(&camera, Arc::new(PreviewSurface::new()));

        manager.set_enabled(true);
        drop(manager);
        tokio::time::sleep(ms(150)).await;

        assert_eq!(camera.issued_streams().len(), 1);
        assert_eq!(camera.live_streams(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn denial_surfaces_a_message_and_does_not_retry() {
        let camera = Arc::new(SimulatedCamera::new().denying());
        let manager = manager(&camera, Arc::new(PreviewSurface::new()));

        manager.set_enabled(true);
        let phase = manager.await_settled().await;
        tokio::time::sleep(ms(500)).await;

        assert_eq!(phase, CapturePhase::Error(DENIED_MESSAGE.to_string()));
        assert_eq!(camera.requests(), 1);
        assert_eq!(
            manager.view(false),
            CameraView::Error {
                message: DENIED_MESSAGE.to_string()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn re_enabling_after_an_error_retries() {
        let camera = Arc::new(SimulatedCamera::new().denying());
        let manager = manager(&camera, Arc::new(PreviewSurface::new()));

        manager.set_enabled(true);
        assert!(matches!(manager.await_settled().await, CapturePhase::Error(_)));

        camera.set_denied(false);
        manager.set_enabled(true);

        assert_eq!(manager.await_settled().await, CapturePhase::Live);
        assert_eq!(camera.requests(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn disabling_keeps_the_error_until_the_next_enable() {
        let camera = Arc::new(SimulatedCamera::new().denying());
        let manager = manager(&camera, Arc::new(PreviewSurface::new()));
        let denied = CameraView::Error {
            message: DENIED_MESSAGE.to_string(),
        };

        manager.set_enabled(true);
        manager.await_settled().await;
        manager.set_enabled(false);

        assert_eq!(manager.phase(), CapturePhase::Error(DENIED_MESSAGE.to_string()));
        assert_eq!(manager.view(false), denied);
        assert_eq!(camera.requests(), 1);

        camera.set_denied(false);
        manager.set_enabled(true);
        assert_eq!(manager.phase(), CapturePhase::Acquiring);
        assert_eq!(manager.await_settled().await, CapturePhase::Live);
        assert_eq!(camera.requests(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn disabling_mid_acquisition_discards_a_late_denial() {
        let camera = Arc::new(SimulatedCamera::new().denying().with_latency(ms(100)));
        let manager = manager(&camera, Arc::new(PreviewSurface::new()));
        let mut phases = manager.phase_updates();

        manager.set_enabled(true);
        tokio::time::sleep(ms(10)).await;
        manager.set_enabled(false);
        let _ = phases.borrow_and_update();

        // Let the superseded request fail.
        tokio::time::sleep(ms(200)).await;

        assert_eq!(camera.requests(), 1);
        assert_eq!(manager.phase(), CapturePhase::Idle);
        assert!(manager.phase().error_message().is_none());
        assert!(!phases.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn disabling_while_live_releases_synchronously() {
        let camera = Arc::new(SimulatedCamera::new());
        let surface = Arc::new(PreviewSurface::new());
        let manager = manager(&camera, surface.clone());

        manager.set_enabled(true);
        assert_eq!(manager.await_settled().await, CapturePhase::Live);
        let streams = camera.issued_streams();

        manager.set_enabled(false);

        assert!(streams[0].tracks().iter().all(|t| t.is_stopped()));
        assert_eq!(surface.bound_stream(), None);
        assert_eq!(manager.phase(), CapturePhase::Idle);
        assert_eq!(manager.stream_id(), None);
        assert_eq!(camera.live_streams(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn bind_failure_degrades_to_a_generic_error() {
        let camera = Arc::new(SimulatedCamera::new());
        let mut sink = MockVideoSink::new();
        sink.expect_attach()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("surface gone")));
        sink.expect_detach().never();
        let manager = manager(&camera, Arc::new(sink));

        manager.set_enabled(true);

        assert_eq!(
            manager.await_settled().await,
            CapturePhase::Error(PREVIEW_FAILED_MESSAGE.to_string())
        );
        assert_eq!(camera.live_streams(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn view_follows_phase() {
        let camera = Arc::new(SimulatedCamera::new().with_latency(ms(20)));
        let manager = manager(&camera, Arc::new(PreviewSurface::new()));

        assert_eq!(
            manager.view(true),
            CameraView::Placeholder {
                caption: PLACEHOLDER_CAPTION
            }
        );

        manager.set_enabled(true);
        assert_eq!(
            manager.view(true),
            CameraView::Loading {
                caption: LOADING_CAPTION
            }
        );

        manager.await_settled().await;
        match manager.view(true) {
            CameraView::Live {
                mirrored,
                recording,
                quality,
                ..
            } => {
                assert!(mirrored);
                assert!(recording);
                assert_eq!(quality, QUALITY_BADGE);
            }
            other => panic!("unexpected view: {other:?}"),
        }
        assert!(matches!(
            manager.view(false),
            CameraView::Live {
                recording: false,
                ..
            }
        ));
    }

    proptest! {
        #[test]
        fn toggling_never_holds_two_live_devices(
            steps in proptest::collection::vec((any::<bool>(), 0u64..60), 1..32)
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .start_paused(true)
                .build()
                .unwrap();

            runtime.block_on(async {
                let camera = Arc::new(SimulatedCamera::new().with_latency(ms(25)));
                let surface = Arc::new(PreviewSurface::new());
                let manager = manager(&camera, surface.clone());

                for (enabled, wait) in steps {
                    manager.set_enabled(enabled);
                    assert!(camera.live_streams() <= 1);
                    tokio::time::sleep(ms(wait)).await;
                    assert!(camera.live_streams() <= 1);
                    // A refused double bind would show up as an error phase.
                    assert!(manager.phase().error_message().is_none());
                    if manager.phase() != CapturePhase::Live {
                        assert_eq!(surface.bound_stream(), None);
                    }
                }

                drop(manager);
                tokio::time::sleep(ms(100)).await;
                assert_eq!(camera.live_streams(), 0);
                assert_eq!(surface.bound_stream(), None);
            });
        }
    }
}
