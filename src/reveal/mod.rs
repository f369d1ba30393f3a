//! Character-by-character reveal of the current question.

mod panel;
mod scroll;

pub use panel::{QuestionFrame, QuestionPanel, INACTIVE_PROMPT};
pub use scroll::{wrapped_lines, ScrollViewport};

use futures::stream::{BoxStream, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Snapshot of a reveal. `shown` is always a prefix of `source`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RevealState {
    source: String,
    shown: String,
    cursor_active: bool,
    #[serde(skip)]
    generation: u64,
}

impl RevealState {
    fn inactive(generation: u64) -> Self {
        Self {
            generation,
            ..Self::default()
        }
    }

    fn start(source: &str, generation: u64) -> Self {
        Self {
            source: source.to_string(),
            shown: String::new(),
            // An empty question is complete before it starts.
            cursor_active: !source.is_empty(),
            generation,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn shown(&self) -> &str {
        &self.shown
    }

    /// Whether the trailing cursor is drawn, i.e. the reveal is unfinished.
    pub fn cursor_active(&self) -> bool {
        self.cursor_active
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_complete(&self) -> bool {
        self.shown.len() == self.source.len()
    }

    /// Reveal one more character. Returns false once there is nothing left.
    fn advance(&mut self) -> bool {
        let next = self.source[self.shown.len()..].chars().next();
        if let Some(c) = next {
            self.shown.push(c);
        }
        self.cursor_active = !self.is_complete();
        next.is_some()
    }
}

/// Drives a [`RevealState`] forward one character per tick.
///
/// Any change of question while active, or any activation, cancels the
/// running ticker and restarts from an empty prefix. Deactivation empties
/// the text and stops the ticker.
pub struct RevealEngine {
    tick: Duration,
    state_tx: Arc<watch::Sender<RevealState>>,
    inputs: Option<(String, bool)>,
    generation: u64,
    ticker: Option<JoinHandle<()>>,
}

impl RevealEngine {
    pub fn new(tick: Duration) -> Self {
        let (state_tx, _) = watch::channel(RevealState::default());
        Self {
            // tokio intervals panic on a zero period.
            tick: tick.max(Duration::from_millis(1)),
            state_tx: Arc::new(state_tx),
            inputs: None,
            generation: 0,
            ticker: None,
        }
    }

    /// Feed the latest inputs. Returns true when the reveal was restarted.
    pub fn update(&mut self, question: &str, is_active: bool) -> bool {
        let unchanged = match &self.inputs {
            Some((q, active)) => *active == is_active && (q == question || !is_active),
            None => false,
        };
        self.inputs = Some((question.to_string(), is_active));
        if unchanged {
            return false;
        }

        self.cancel();
        self.generation += 1;

        if !is_active {
            tracing::debug!("question reveal cleared (generation {})", self.generation);
            self.state_tx.send_replace(RevealState::inactive(self.generation));
            return false;
        }

        let state = RevealState::start(question, self.generation);
        let complete = state.is_complete();
        self.state_tx.send_replace(state);
        tracing::debug!(
            "revealing question of {} chars (generation {})",
            question.chars().count(),
            self.generation
        );

        if !complete {
            let start = Instant::now() + self.tick;
            self.ticker = Some(tokio::spawn(run_ticker(
                Arc::clone(&self.state_tx),
                self.generation,
                start,
                self.tick,
            )));
        }
        true
    }

    pub fn state(&self) -> RevealState {
        self.state_tx.borrow().clone()
    }

    /// True while a ticker is running for the current generation.
    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn subscribe(&self) -> watch::Receiver<RevealState> {
        self.state_tx.subscribe()
    }

    /// Every state published after this call, ending when the engine drops.
    ///
    /// Intermediate states may be coalesced if the consumer lags.
    pub fn updates(&self) -> BoxStream<'static, RevealState> {
        futures::stream::unfold(self.subscribe(), |mut rx| async move {
            rx.changed().await.ok()?;
            let state = rx.borrow_and_update().clone();
            Some((state, rx))
        })
        .boxed()
    }

    fn cancel(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for RevealEngine {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_ticker(
    state_tx: Arc<watch::Sender<RevealState>>,
    generation: u64,
    start: Instant,
    tick: Duration,
) {
    let mut interval = tokio::time::interval_at(start, tick);
    loop {
        interval.tick().await;
        let mut finished = false;
        state_tx.send_if_modified(|state| {
            // A newer reveal owns the state now.
            if state.generation != generation {
                finished = true;
                return false;
            }
            let advanced = state.advance();
            finished = state.is_complete();
            advanced
        });
        if finished {
            break;
        }
    }
}
