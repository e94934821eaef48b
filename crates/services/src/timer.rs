use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tracing::trace;

/// Spacing of countdown ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Pause between picking an option and moving to the next question.
pub const ADVANCE_DELAY: Duration = Duration::from_secs(1);

/// A scheduled signal, tagged with the question it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerSignal {
    Tick { index: usize },
    AdvanceDue { index: usize },
}

impl TimerSignal {
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Tick { index } | Self::AdvanceDue { index } => index,
        }
    }
}

/// Receiving end of a [`QuestionTimer`].
pub struct TimerSignals {
    rx: UnboundedReceiver<TimerSignal>,
}

impl TimerSignals {
    /// Wait for the next signal. `None` once the timer has been dropped.
    pub async fn recv(&mut self) -> Option<TimerSignal> {
        self.rx.recv().await
    }

    /// Take a signal that is already queued, without waiting.
    pub fn try_recv(&mut self) -> Option<TimerSignal> {
        self.rx.try_recv().ok()
    }
}

/// The single scheduled resource of a quiz: either the countdown of the open
/// question or the advance delay after a selection.
///
/// At most one task is alive. Every `start_*` call aborts the previous task
/// before spawning its own, and dropping the timer aborts whatever is left.
/// Must be used from within a tokio runtime.
pub struct QuestionTimer {
    tx: UnboundedSender<TimerSignal>,
    task: Option<JoinHandle<()>>,
    tick: Duration,
    advance_delay: Duration,
}

impl QuestionTimer {
    /// Create a timer and the stream of signals it produces.
    #[must_use]
    pub fn channel() -> (Self, TimerSignals) {
        let (tx, rx) = unbounded_channel();
        (
            Self {
                tx,
                task: None,
                tick: TICK_INTERVAL,
                advance_delay: ADVANCE_DELAY,
            },
            TimerSignals { rx },
        )
    }

    #[must_use]
    pub fn with_intervals(mut self, tick: Duration, advance_delay: Duration) -> Self {
        self.tick = tick;
        self.advance_delay = advance_delay;
        self
    }

    /// Tick once per interval for question `index` until cancelled.
    pub fn start_countdown(&mut self, index: usize) {
        self.cancel();
        let tx = self.tx.clone();
        let tick = self.tick;
        trace!(index, "countdown started");
        self.task = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(tick).await;
                if tx.send(TimerSignal::Tick { index }).is_err() {
                    break;
                }
            }
        }));
    }

    /// Emit a single `AdvanceDue` for question `index` after the advance delay.
    pub fn schedule_advance(&mut self, index: usize) {
        self.cancel();
        let tx = self.tx.clone();
        let delay = self.advance_delay;
        trace!(index, "advance scheduled");
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(TimerSignal::AdvanceDue { index });
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for QuestionTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
