use rand::rngs::StdRng;
use tracing::warn;

use quiz_core::model::Outcome;
use quiz_core::session::{NO_SELECTION_MESSAGE, QuizSession, SessionError};
use services::{
    Clock, QuestionView, QuizError, QuizFlowService, QuizRunner, Step, TimerSignal, TimerSignals,
};

use crate::views::ViewError;
use crate::vm::time_fmt::format_countdown;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Select(String),
    Next,
    Skip,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizOutcome {
    Continue,
    Finished,
}

/// Quiz page state: the running quiz plus the inline option error.
pub struct QuizVm {
    runner: QuizRunner,
    option_error: Option<&'static str>,
}

impl QuizVm {
    /// Start `session` and return the signal stream to pump into [`Self::on_signal`].
    #[must_use]
    pub fn start(session: QuizSession, clock: Clock) -> (Self, TimerSignals) {
        let (runner, signals) = QuizRunner::new(session, clock);
        (Self::from_runner(runner), signals)
    }

    #[must_use]
    pub fn start_with_rng(session: QuizSession, clock: Clock, rng: StdRng) -> (Self, TimerSignals) {
        let (runner, signals) = QuizRunner::with_rng(session, clock, rng);
        (Self::from_runner(runner), signals)
    }

    fn from_runner(mut runner: QuizRunner) -> Self {
        runner.start();
        Self {
            runner,
            option_error: None,
        }
    }

    #[must_use]
    pub fn view(&self) -> Option<QuestionView> {
        self.runner.view()
    }

    #[must_use]
    pub fn option_error(&self) -> Option<&'static str> {
        self.option_error
    }

    #[must_use]
    pub fn time_label(&self) -> String {
        format_countdown(self.runner.session().time_left())
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        self.runner.session()
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the runner rejects the input for any
    /// reason other than a missing selection.
    pub fn apply(&mut self, intent: QuizIntent) -> Result<QuizOutcome, ViewError> {
        let result = match intent {
            QuizIntent::Select(option) => self.runner.select(option),
            QuizIntent::Next => self.runner.next(),
            QuizIntent::Skip => self.runner.skip(),
        };
        match result {
            Ok(step) => Ok(self.after(step)),
            Err(QuizError::Session(SessionError::NoSelection)) => {
                self.option_error = Some(NO_SELECTION_MESSAGE);
                Ok(QuizOutcome::Continue)
            }
            Err(err) => {
                warn!(error = %err, "quiz input rejected");
                Err(ViewError::Unknown)
            }
        }
    }

    pub fn on_signal(&mut self, signal: TimerSignal) -> QuizOutcome {
        match self.runner.on_signal(signal) {
            Ok(step) => self.after(step),
            Err(err) => {
                warn!(error = %err, ?signal, "timer signal rejected");
                QuizOutcome::Continue
            }
        }
    }

    fn after(&mut self, step: Step) -> QuizOutcome {
        match step {
            Step::Ignored | Step::Ticked { .. } => QuizOutcome::Continue,
            Step::Answered { .. } | Step::Question { .. } => {
                self.option_error = None;
                QuizOutcome::Continue
            }
            Step::Finished => {
                self.option_error = None;
                QuizOutcome::Finished
            }
        }
    }
}

/// The session to store, unless a finish is already running or no quiz is open.
#[must_use]
pub fn session_to_finish(vm: Option<&QuizVm>, finishing: bool) -> Option<QuizSession> {
    if finishing {
        return None;
    }
    vm.map(|vm| vm.session().clone())
}

/// Resume the handed-off quiz.
///
/// # Errors
///
/// Returns `ViewError::NoActiveQuiz` if the entry page was skipped.
pub async fn start_quiz(
    flow: &QuizFlowService,
    clock: Clock,
) -> Result<(QuizVm, TimerSignals), ViewError> {
    let session = flow
        .resume()
        .await
        .map_err(|err| ViewError::from_quiz(&err))?;
    Ok(QuizVm::start(session, clock))
}

/// Tally the finished quiz and store the results.
///
/// # Errors
///
/// Returns `ViewError::Unknown` if the results cannot be stored.
pub async fn finish_quiz(
    flow: &QuizFlowService,
    session: &QuizSession,
) -> Result<Outcome, ViewError> {
    flow.finish(session)
        .await
        .map(|result| result.outcome)
        .map_err(|err| ViewError::from_quiz(&err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Question;
    use quiz_core::time::{fixed_clock, fixed_now};
    use rand::SeedableRng;

    fn build_vm() -> (QuizVm, TimerSignals) {
        let questions = vec![
            Question::new("Q1", "yes", ["no"]).unwrap(),
            Question::new("Q2", "up", ["down"]).unwrap(),
        ];
        let session = QuizSession::new("Test", questions, fixed_now()).unwrap();
        QuizVm::start_with_rng(session, fixed_clock(), StdRng::seed_from_u64(5))
    }

    #[tokio::test(start_paused = true)]
    async fn next_without_selection_shows_inline_error() {
        let (mut vm, _signals) = build_vm();
        assert_eq!(vm.apply(QuizIntent::Next), Ok(QuizOutcome::Continue));
        assert_eq!(vm.option_error(), Some(NO_SELECTION_MESSAGE));
        assert_eq!(vm.view().unwrap().index, 0);

        vm.apply(QuizIntent::Select("yes".into())).unwrap();
        assert_eq!(vm.option_error(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn skipping_through_finishes() {
        let (mut vm, _signals) = build_vm();
        assert_eq!(vm.time_label(), "0:10");
        assert_eq!(vm.apply(QuizIntent::Skip), Ok(QuizOutcome::Continue));
        assert_eq!(vm.apply(QuizIntent::Skip), Ok(QuizOutcome::Finished));
        assert!(vm.view().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_update_the_label() {
        let (mut vm, mut signals) = build_vm();
        let signal = signals.recv().await.unwrap();
        assert_eq!(vm.on_signal(signal), QuizOutcome::Continue);
        assert_eq!(vm.time_label(), "0:09");
    }

    #[tokio::test(start_paused = true)]
    async fn foreign_option_is_an_error() {
        let (mut vm, _signals) = build_vm();
        assert_eq!(
            vm.apply(QuizIntent::Select("maybe".into())),
            Err(ViewError::Unknown)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn finishing_needs_an_open_quiz_and_no_finish_in_flight() {
        assert!(session_to_finish(None, false).is_none());

        let (mut vm, _signals) = build_vm();
        vm.apply(QuizIntent::Skip).unwrap();
        vm.apply(QuizIntent::Skip).unwrap();
        assert!(session_to_finish(Some(&vm), true).is_none());

        let session = session_to_finish(Some(&vm), false).unwrap();
        assert!(session.is_finished());
    }
}
