use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use quiz_core::session::{QuizEvent, QuizSession, SessionPhase, Transition};

use crate::Clock;
use crate::error::QuizError;
use crate::presenter::{QuestionView, shuffled_options};
use crate::timer::{QuestionTimer, TimerSignal, TimerSignals};

/// What the page should do after an event was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Stale or late input; nothing changed.
    Ignored,
    Ticked { remaining: u32 },
    Answered { is_correct: bool },
    /// A new question is open.
    Question { index: usize },
    /// The last question was left; results can be computed.
    Finished,
}

/// Drives a [`QuizSession`]: keeps the option order of the open question and
/// owns the timer that feeds ticks and delayed advances back in.
pub struct QuizRunner {
    session: QuizSession,
    timer: QuestionTimer,
    rng: StdRng,
    order: Vec<String>,
    clock: Clock,
}

impl QuizRunner {
    /// Wrap `session` with an entropy-seeded shuffle.
    ///
    /// Returns the runner and the signal stream the caller must pump back
    /// through [`Self::on_signal`].
    #[must_use]
    pub fn new(session: QuizSession, clock: Clock) -> (Self, TimerSignals) {
        Self::with_rng(session, clock, StdRng::from_rng(&mut rand::rng()))
    }

    #[must_use]
    pub fn with_rng(session: QuizSession, clock: Clock, rng: StdRng) -> (Self, TimerSignals) {
        let (timer, signals) = QuestionTimer::channel();
        (Self::with_timer(session, clock, rng, timer), signals)
    }

    /// Build on a caller-made timer, e.g. one with custom intervals.
    #[must_use]
    pub fn with_timer(session: QuizSession, clock: Clock, rng: StdRng, timer: QuestionTimer) -> Self {
        Self {
            session,
            timer,
            rng,
            order: Vec::new(),
            clock,
        }
    }

    /// Show the first question and start its countdown.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        info!(
            session_id = %self.session.id(),
            category = %self.session.category(),
            total = self.session.total(),
            "quiz started"
        );
        self.enter_current();
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn into_session(self) -> QuizSession {
        self.session
    }

    /// Option texts of the open question in display order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.order
    }

    #[must_use]
    pub fn view(&self) -> Option<QuestionView> {
        QuestionView::from_session(&self.session, &self.order)
    }

    /// Pick `option` for the open question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` if the option does not belong to the question.
    pub fn select(&mut self, option: impl Into<String>) -> Result<Step, QuizError> {
        let index = self.session.current_index();
        self.dispatch(QuizEvent::Select {
            index,
            option: option.into(),
        })
    }

    /// # Errors
    ///
    /// Returns `QuizError::Session` with `NoSelection` when nothing was picked yet.
    pub fn next(&mut self) -> Result<Step, QuizError> {
        let index = self.session.current_index();
        self.dispatch(QuizEvent::Next { index })
    }

    /// # Errors
    ///
    /// Never fails for a skip; the `Result` mirrors [`Self::dispatch`].
    pub fn skip(&mut self) -> Result<Step, QuizError> {
        let index = self.session.current_index();
        self.dispatch(QuizEvent::Skip { index })
    }

    /// Feed a timer signal back into the session.
    ///
    /// # Errors
    ///
    /// Mirrors [`Self::dispatch`]; timer events never fail in practice.
    pub fn on_signal(&mut self, signal: TimerSignal) -> Result<Step, QuizError> {
        let event = match signal {
            TimerSignal::Tick { index } => QuizEvent::Tick { index },
            TimerSignal::AdvanceDue { index } => QuizEvent::Advance { index },
        };
        self.dispatch(event)
    }

    /// Apply one event and reschedule the timer accordingly.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` when the session rejects the event. The
    /// session and timer are left untouched in that case.
    pub fn dispatch(&mut self, event: QuizEvent) -> Result<Step, QuizError> {
        let now = self.clock.now();
        let transition = self.session.apply(event, now)?;
        let step = match transition {
            Transition::Ignored => Step::Ignored,
            Transition::Ticked { remaining } => Step::Ticked { remaining },
            Transition::Answered { index, is_correct } => {
                debug!(
                    session_id = %self.session.id(),
                    index,
                    is_correct,
                    "answer recorded"
                );
                self.timer.schedule_advance(index);
                Step::Answered { is_correct }
            }
            Transition::Moved { reason, to } => {
                debug!(session_id = %self.session.id(), ?reason, "left question");
                match to {
                    SessionPhase::Finished => {
                        self.timer.cancel();
                        self.order.clear();
                        info!(
                            session_id = %self.session.id(),
                            score = self.session.score(),
                            unanswered = self.session.unanswered(),
                            "quiz finished"
                        );
                        Step::Finished
                    }
                    SessionPhase::AwaitingAnswer { index } | SessionPhase::Answered { index, .. } => {
                        self.enter_current();
                        Step::Question { index }
                    }
                }
            }
        };
        Ok(step)
    }

    fn enter_current(&mut self) {
        let Some(question) = self.session.current_question() else {
            self.timer.cancel();
            self.order.clear();
            return;
        };
        self.order = shuffled_options(question, &mut self.rng);
        self.timer.start_countdown(self.session.current_index());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Question;
    use quiz_core::session::SessionError;
    use quiz_core::time::{fixed_clock, fixed_now};
    use std::time::Duration;

    fn build_runner(count: usize) -> (QuizRunner, TimerSignals) {
        let questions = (0..count)
            .map(|n| Question::new(format!("Q{n}"), format!("right{n}"), ["wrong"]).unwrap())
            .collect();
        let session = QuizSession::new("Test", questions, fixed_now()).unwrap();
        let mut pair = QuizRunner::with_rng(session, fixed_clock(), StdRng::seed_from_u64(3));
        pair.0.start();
        pair
    }

    async fn pump_until_finished(runner: &mut QuizRunner, signals: &mut TimerSignals) {
        while !runner.session().is_finished() {
            let signal = signals.recv().await.unwrap();
            runner.on_signal(signal).unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn start_shows_first_question_shuffled() {
        let (runner, _signals) = build_runner(2);
        let view = runner.view().unwrap();
        assert_eq!(view.index, 0);
        assert_eq!(view.options.len(), 2);
        assert!(view.options.iter().any(|o| o.text == "right0"));
        assert_eq!(view.time_left, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn ignoring_every_question_times_out_the_quiz() {
        let (mut runner, mut signals) = build_runner(3);
        pump_until_finished(&mut runner, &mut signals).await;

        let summary = runner.session().result_summary().unwrap();
        assert_eq!(summary.unanswered(), 3);
        assert_eq!(summary.correct(), 0);
        assert_eq!(summary.percentage(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn selection_advances_after_the_delay() {
        let (mut runner, mut signals) = build_runner(2);
        let step = runner.select("right0").unwrap();
        assert_eq!(step, Step::Answered { is_correct: true });
        assert!(runner.view().unwrap().locked);

        let signal = signals.recv().await.unwrap();
        assert_eq!(signal, TimerSignal::AdvanceDue { index: 0 });
        assert_eq!(runner.on_signal(signal).unwrap(), Step::Question { index: 1 });
        assert_eq!(runner.view().unwrap().time_left, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn next_before_the_delay_wins_and_late_advance_is_ignored() {
        let (mut runner, mut signals) = build_runner(2);
        runner.select("wrong").unwrap();
        assert_eq!(runner.next().unwrap(), Step::Question { index: 1 });

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        while let Some(signal) = signals.try_recv() {
            assert_eq!(signal.index(), 1, "{signal:?}");
            runner.on_signal(signal).unwrap();
        }
        assert_eq!(runner.session().current_index(), 1);
        assert_eq!(runner.session().answers().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn next_without_selection_is_rejected() {
        let (mut runner, _signals) = build_runner(1);
        let err = runner.next().unwrap_err();
        assert!(matches!(err, QuizError::Session(SessionError::NoSelection)));
        assert_eq!(runner.session().current_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn skip_on_last_question_finishes() {
        let (mut runner, _signals) = build_runner(1);
        assert_eq!(runner.skip().unwrap(), Step::Finished);
        assert!(runner.view().is_none());
        assert!(runner.options().is_empty());
        let summary = runner.into_session().result_summary().unwrap();
        assert_eq!(summary.unanswered(), 1);
    }
}
