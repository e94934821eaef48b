use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::countdown::{Countdown, CountdownTick, QUESTION_SECONDS};
use crate::model::{AnswerRecord, Question, ResultError, ResultSummary, SessionId};

pub const NO_SELECTION_MESSAGE: &str = "Please select an option or click Skip to move on";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for quiz")]
    Empty,

    #[error("Please select an option or click Skip to move on")]
    NoSelection,

    #[error("option {option:?} does not belong to question {index}")]
    UnknownOption { index: usize, option: String },

    #[error("quiz is not finished yet")]
    NotFinished,

    #[error(transparent)]
    Result(#[from] ResultError),
}

//
// ─── EVENTS / TRANSITIONS ──────────────────────────────────────────────────────
//

/// Input to the session. Every event names the question it was issued for;
/// events for any other question are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    /// The user picked an option.
    Select { index: usize, option: String },
    /// One second elapsed on the countdown.
    Tick { index: usize },
    /// The user gave up on the question.
    Skip { index: usize },
    /// The user pressed "next".
    Next { index: usize },
    /// The review delay after a selection ran out.
    Advance { index: usize },
}

impl QuizEvent {
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::Select { index, .. }
            | Self::Tick { index }
            | Self::Skip { index }
            | Self::Next { index }
            | Self::Advance { index } => *index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Options open, countdown running.
    AwaitingAnswer { index: usize },
    /// An option was picked; options are locked until the question advances.
    Answered { index: usize, is_correct: bool },
    Finished,
}

/// Why the session left a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveReason {
    Answered,
    TimedOut,
    Skipped,
}

/// What a single event did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Stale, late, or otherwise irrelevant event. Nothing changed.
    Ignored,
    Ticked { remaining: u32 },
    Answered { index: usize, is_correct: bool },
    Moved { reason: MoveReason, to: SessionPhase },
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// State of one quiz run, threaded explicitly through every transition.
#[derive(Clone)]
pub struct QuizSession {
    id: SessionId,
    category: String,
    questions: Vec<Question>,
    phase: SessionPhase,
    current: usize,
    score: u32,
    answers: Vec<AnswerRecord>,
    unanswered: u32,
    countdown: Countdown,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Create a session positioned on the first question.
    ///
    /// `started_at` should come from the services layer clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no questions are provided.
    pub fn new(
        category: impl Into<String>,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        Ok(Self {
            id: SessionId::new(),
            category: category.into(),
            questions,
            phase: SessionPhase::AwaitingAnswer { index: 0 },
            current: 0,
            score: 0,
            answers: Vec::new(),
            unanswered: 0,
            countdown: Countdown::new(QUESTION_SECONDS),
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Index of the question on screen; equals `total()` once finished.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn unanswered(&self) -> u32 {
        self.unanswered
    }

    #[must_use]
    pub fn time_left(&self) -> u32 {
        self.countdown.remaining()
    }

    #[must_use]
    pub fn is_countdown_running(&self) -> bool {
        self.countdown.is_running()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, SessionPhase::Finished)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// The record for the question on screen, if it was answered.
    #[must_use]
    pub fn current_answer(&self) -> Option<&AnswerRecord> {
        match self.phase {
            SessionPhase::Answered { .. } => self.answers.last(),
            _ => None,
        }
    }

    /// Apply one event.
    ///
    /// `now` stamps the completion time when the last question is left.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSelection` for "next" before any option was picked,
    /// and `SessionError::UnknownOption` for a selection that is not an option of
    /// the current question. The session is unchanged in both cases.
    pub fn apply(
        &mut self,
        event: QuizEvent,
        now: DateTime<Utc>,
    ) -> Result<Transition, SessionError> {
        let index = match self.phase {
            SessionPhase::Finished => return Ok(Transition::Ignored),
            SessionPhase::AwaitingAnswer { index } | SessionPhase::Answered { index, .. } => index,
        };
        if event.index() != index {
            return Ok(Transition::Ignored);
        }
        let answered = matches!(self.phase, SessionPhase::Answered { .. });

        match event {
            QuizEvent::Select { option, .. } => {
                if answered {
                    return Ok(Transition::Ignored);
                }
                self.record_selection(index, option)
            }
            QuizEvent::Tick { .. } => {
                if answered {
                    return Ok(Transition::Ignored);
                }
                match self.countdown.tick() {
                    CountdownTick::Remaining(remaining) => Ok(Transition::Ticked { remaining }),
                    CountdownTick::Expired => {
                        self.unanswered += 1;
                        Ok(self.advance(MoveReason::TimedOut, now))
                    }
                    CountdownTick::Stopped => Ok(Transition::Ignored),
                }
            }
            QuizEvent::Skip { .. } => {
                // Skipping an answered question just moves on; it was already counted.
                if answered {
                    return Ok(self.advance(MoveReason::Answered, now));
                }
                self.countdown.cancel();
                self.unanswered += 1;
                Ok(self.advance(MoveReason::Skipped, now))
            }
            QuizEvent::Next { .. } => {
                if !answered {
                    return Err(SessionError::NoSelection);
                }
                Ok(self.advance(MoveReason::Answered, now))
            }
            QuizEvent::Advance { .. } => {
                if !answered {
                    return Ok(Transition::Ignored);
                }
                Ok(self.advance(MoveReason::Answered, now))
            }
        }
    }

    fn record_selection(&mut self, index: usize, option: String) -> Result<Transition, SessionError> {
        let Some(question) = self.questions.get(index) else {
            return Ok(Transition::Ignored);
        };
        if !question.has_option(&option) {
            return Err(SessionError::UnknownOption { index, option });
        }

        let is_correct = question.is_correct(&option);
        self.countdown.cancel();
        self.answers
            .push(AnswerRecord::new(question.prompt(), option, is_correct));
        if is_correct {
            self.score += 1;
        }
        self.phase = SessionPhase::Answered { index, is_correct };
        Ok(Transition::Answered { index, is_correct })
    }

    fn advance(&mut self, reason: MoveReason, now: DateTime<Utc>) -> Transition {
        self.countdown.cancel();
        self.current += 1;
        if self.current >= self.questions.len() {
            self.current = self.questions.len();
            self.phase = SessionPhase::Finished;
            self.completed_at = Some(now);
        } else {
            self.phase = SessionPhase::AwaitingAnswer {
                index: self.current,
            };
            self.countdown.restart();
        }
        Transition::Moved {
            reason,
            to: self.phase,
        }
    }

    /// Tally the finished session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` before the last question was left.
    pub fn result_summary(&self) -> Result<ResultSummary, SessionError> {
        if !self.is_finished() {
            return Err(SessionError::NotFinished);
        }
        let total = u32::try_from(self.total()).unwrap_or(u32::MAX);
        let incorrect = u32::try_from(self.answers.iter().filter(|a| !a.is_correct).count())
            .unwrap_or(u32::MAX);
        Ok(ResultSummary::new(
            total,
            self.score,
            incorrect,
            self.unanswered,
        )?)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("questions_len", &self.questions.len())
            .field("phase", &self.phase)
            .field("score", &self.score)
            .field("answers_len", &self.answers.len())
            .field("unanswered", &self.unanswered)
            .field("time_left", &self.countdown.remaining())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Outcome;
    use crate::time::fixed_now;

    fn build_question(n: usize) -> Question {
        Question::new(
            format!("Q{n}"),
            format!("right{n}"),
            [format!("wrong{n}a"), format!("wrong{n}b")],
        )
        .unwrap()
    }

    fn build_session(total: usize) -> QuizSession {
        let questions = (0..total).map(build_question).collect();
        QuizSession::new("Science", questions, fixed_now()).unwrap()
    }

    fn select(session: &mut QuizSession, option: &str) -> Transition {
        let index = session.current_index();
        session
            .apply(
                QuizEvent::Select {
                    index,
                    option: option.to_string(),
                },
                fixed_now(),
            )
            .unwrap()
    }

    fn advance(session: &mut QuizSession) -> Transition {
        let index = session.current_index();
        session
            .apply(QuizEvent::Advance { index }, fixed_now())
            .unwrap()
    }

    fn expire(session: &mut QuizSession) -> Transition {
        let index = session.current_index();
        let mut last = Transition::Ignored;
        for _ in 0..QUESTION_SECONDS {
            last = session
                .apply(QuizEvent::Tick { index }, fixed_now())
                .unwrap();
        }
        last
    }

    #[test]
    fn empty_session_returns_error() {
        let err = QuizSession::new("Science", Vec::new(), fixed_now()).unwrap_err();
        assert_eq!(err, SessionError::Empty);
    }

    #[test]
    fn correct_selection_scores_once_and_records_once() {
        let mut session = build_session(2);
        let t = select(&mut session, "right0");
        assert_eq!(
            t,
            Transition::Answered {
                index: 0,
                is_correct: true
            }
        );
        assert_eq!(session.score(), 1);
        assert_eq!(session.answers().len(), 1);
        assert_eq!(session.answers()[0], AnswerRecord::new("Q0", "right0", true));
        assert!(!session.is_countdown_running());
        assert_eq!(session.current_index(), 0);

        let t = advance(&mut session);
        assert_eq!(
            t,
            Transition::Moved {
                reason: MoveReason::Answered,
                to: SessionPhase::AwaitingAnswer { index: 1 }
            }
        );
        assert_eq!(session.time_left(), QUESTION_SECONDS);
        assert!(session.is_countdown_running());
    }

    #[test]
    fn incorrect_selection_records_without_scoring() {
        let mut session = build_session(1);
        select(&mut session, "wrong0a");
        assert_eq!(session.score(), 0);
        assert_eq!(session.answers().len(), 1);
        assert!(!session.answers()[0].is_correct);
    }

    #[test]
    fn timeout_counts_unanswered_without_record() {
        let mut session = build_session(2);
        let t = expire(&mut session);
        assert_eq!(
            t,
            Transition::Moved {
                reason: MoveReason::TimedOut,
                to: SessionPhase::AwaitingAnswer { index: 1 }
            }
        );
        assert_eq!(session.unanswered(), 1);
        assert!(session.answers().is_empty());
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn ticks_count_down_from_ten() {
        let mut session = build_session(1);
        let t = session
            .apply(QuizEvent::Tick { index: 0 }, fixed_now())
            .unwrap();
        assert_eq!(t, Transition::Ticked { remaining: 9 });
        assert_eq!(session.time_left(), 9);
    }

    #[test]
    fn skip_behaves_like_timeout() {
        let mut session = build_session(2);
        let t = session
            .apply(QuizEvent::Skip { index: 0 }, fixed_now())
            .unwrap();
        assert!(matches!(
            t,
            Transition::Moved {
                reason: MoveReason::Skipped,
                ..
            }
        ));
        assert_eq!(session.unanswered(), 1);
        assert!(session.answers().is_empty());
    }

    #[test]
    fn skip_after_selection_does_not_double_count() {
        let mut session = build_session(1);
        select(&mut session, "right0");
        session
            .apply(QuizEvent::Skip { index: 0 }, fixed_now())
            .unwrap();
        let summary = session.result_summary().unwrap();
        assert_eq!(summary.correct(), 1);
        assert_eq!(summary.unanswered(), 0);
    }

    #[test]
    fn next_without_selection_is_rejected_and_changes_nothing() {
        let mut session = build_session(2);
        let err = session
            .apply(QuizEvent::Next { index: 0 }, fixed_now())
            .unwrap_err();
        assert_eq!(err, SessionError::NoSelection);
        assert_eq!(err.to_string(), NO_SELECTION_MESSAGE);
        assert_eq!(session.current_index(), 0);
        assert!(session.is_countdown_running());
    }

    #[test]
    fn next_after_selection_moves_on() {
        let mut session = build_session(2);
        select(&mut session, "wrong0b");
        let t = session
            .apply(QuizEvent::Next { index: 0 }, fixed_now())
            .unwrap();
        assert!(matches!(t, Transition::Moved { .. }));
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut session = build_session(1);
        let err = session
            .apply(
                QuizEvent::Select {
                    index: 0,
                    option: "nope".into(),
                },
                fixed_now(),
            )
            .unwrap_err();
        assert!(matches!(err, SessionError::UnknownOption { index: 0, .. }));
        assert!(session.answers().is_empty());
    }

    #[test]
    fn late_click_after_timeout_is_ignored() {
        let mut session = build_session(2);
        expire(&mut session);
        let t = session
            .apply(
                QuizEvent::Select {
                    index: 0,
                    option: "right0".into(),
                },
                fixed_now(),
            )
            .unwrap();
        assert_eq!(t, Transition::Ignored);
        assert_eq!(session.score(), 0);
        assert!(session.answers().is_empty());
    }

    #[test]
    fn second_click_on_answered_question_is_ignored() {
        let mut session = build_session(1);
        select(&mut session, "wrong0a");
        let t = select(&mut session, "right0");
        assert_eq!(t, Transition::Ignored);
        assert_eq!(session.score(), 0);
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn ticks_after_selection_are_ignored() {
        let mut session = build_session(1);
        select(&mut session, "right0");
        let t = session
            .apply(QuizEvent::Tick { index: 0 }, fixed_now())
            .unwrap();
        assert_eq!(t, Transition::Ignored);
        assert_eq!(session.unanswered(), 0);
    }

    #[test]
    fn index_grows_by_one_and_finishes_once() {
        let mut session = build_session(4);
        for n in 0..4 {
            assert_eq!(session.current_index(), n);
            session
                .apply(QuizEvent::Skip { index: n }, fixed_now())
                .unwrap();
        }
        assert_eq!(session.current_index(), 4);
        assert!(session.is_finished());
        assert_eq!(session.completed_at(), Some(fixed_now()));

        for event in [
            QuizEvent::Skip { index: 4 },
            QuizEvent::Tick { index: 3 },
            QuizEvent::Advance { index: 3 },
        ] {
            assert_eq!(session.apply(event, fixed_now()).unwrap(), Transition::Ignored);
        }
        assert_eq!(session.current_index(), 4);
        assert_eq!(session.unanswered(), 4);
    }

    #[test]
    fn mixed_quiz_lands_in_average_band() {
        let mut session = build_session(5);
        select(&mut session, "right0");
        advance(&mut session);
        select(&mut session, "right1");
        advance(&mut session);
        select(&mut session, "wrong2a");
        advance(&mut session);
        expire(&mut session);
        select(&mut session, "right4");
        assert_eq!(session.result_summary().unwrap_err(), SessionError::NotFinished);
        advance(&mut session);

        let summary = session.result_summary().unwrap();
        assert_eq!(summary, ResultSummary::new(5, 3, 1, 1).unwrap());
        assert_eq!(summary.percentage(), 60);
        assert_eq!(summary.outcome(), Outcome::Average);
    }

    #[test]
    fn counts_always_add_up_to_total() {
        // Walk every right/wrong/skip/timeout pattern for a three-question quiz.
        for pattern in 0..64_u32 {
            let mut session = build_session(3);
            let mut code = pattern;
            for _ in 0..3 {
                let index = session.current_index();
                match code % 4 {
                    0 => {
                        select(&mut session, &format!("right{index}"));
                        advance(&mut session);
                    }
                    1 => {
                        select(&mut session, &format!("wrong{index}a"));
                        advance(&mut session);
                    }
                    2 => {
                        session
                            .apply(QuizEvent::Skip { index }, fixed_now())
                            .unwrap();
                    }
                    _ => {
                        expire(&mut session);
                    }
                }
                code /= 4;
            }
            let summary = session.result_summary().unwrap();
            assert_eq!(
                summary.correct() + summary.incorrect() + summary.unanswered(),
                summary.total()
            );
        }
    }
}
