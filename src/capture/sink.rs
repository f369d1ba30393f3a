use interview_session_utils::MediaStream;
#[cfg(test)]
use mockall::automock;
use std::sync::Mutex;

/// Where a live camera stream is displayed.
///
/// The sink only shows the stream locally; it never owns it. Stopping the
/// tracks stays the job of the capture manager.
#[cfg_attr(test, automock)]
pub trait VideoSink: Send + Sync {
    /// Bind the stream to the surface.
    fn attach(&self, stream: &MediaStream) -> anyhow::Result<()>;

    /// Clear whatever is bound. Clearing an empty surface is a no-op.
    fn detach(&self);
}

/// An in-memory preview surface that remembers what it is showing.
///
/// It refuses to bind a second stream over an existing one, which makes a
/// double binding show up as an error instead of passing silently.
#[derive(Debug, Default)]
pub struct PreviewSurface {
    state: Mutex<SurfaceState>,
}

#[derive(Debug, Default)]
struct SurfaceState {
    bound: Option<String>,
    attaches: usize,
}

impl PreviewSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the stream currently shown, if any.
    pub fn bound_stream(&self) -> Option<String> {
        self.with_state(|state| state.bound.clone())
    }

    /// Total number of successful binds over the surface's lifetime.
    pub fn attach_count(&self) -> usize {
        self.with_state(|state| state.attaches)
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut SurfaceState) -> T) -> T {
        match self.state.lock() {
            Ok(mut state) => f(&mut *state),
            Err(poisoned) => f(&mut *poisoned.into_inner()),
        }
    }
}

impl VideoSink for PreviewSurface {
    fn attach(&self, stream: &MediaStream) -> anyhow::Result<()> {
        self.with_state(|state| {
            if let Some(current) = &state.bound {
                return Err(anyhow::anyhow!(
                    "preview already bound to {current}, refusing {}",
                    stream.id()
                ));
            }
            state.bound = Some(stream.id().to_string());
            state.attaches += 1;
            Ok(())
        })
    }

    fn detach(&self) {
        self.with_state(|state| {
            state.bound = None;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_session_utils::MediaTrack;

    fn stream(id: &str) -> MediaStream {
        MediaStream::new(id, vec![MediaTrack::video(format!("{id}-v"), "cam", 1280, 720)])
    }

    #[test]
    fn refuses_to_double_bind() {
        let surface = PreviewSurface::new();
        surface.attach(&stream("a")).unwrap();

        assert!(surface.attach(&stream("b")).is_err());
        assert_eq!(surface.bound_stream().as_deref(), Some("a"));

        surface.detach();
        surface.attach(&stream("b")).unwrap();
        assert_eq!(surface.bound_stream().as_deref(), Some("b"));
        assert_eq!(surface.attach_count(), 2);
    }
}
