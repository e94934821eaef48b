use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::Question;
use quiz_core::session::{QuizSession, SessionPhase};

/// Options of `question` in a uniformly random order (Fisher–Yates).
pub fn shuffled_options<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Vec<String> {
    let mut options = question.options();
    options.as_mut_slice().shuffle(rng);
    options
}

/// How an option is marked after the question was answered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionMark {
    Unmarked,
    Correct,
    Incorrect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionView {
    pub text: String,
    pub mark: OptionMark,
    pub enabled: bool,
}

/// Everything the quiz page needs to draw the current question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub prompt: String,
    pub options: Vec<OptionView>,
    pub time_left: u32,
    pub locked: bool,
}

impl QuestionView {
    /// Build the view for the session's current question using a fixed option order.
    ///
    /// Returns `None` once the session is finished.
    #[must_use]
    pub fn from_session(session: &QuizSession, order: &[String]) -> Option<Self> {
        let question = session.current_question()?;
        let (locked, selected) = match session.phase() {
            SessionPhase::AwaitingAnswer { .. } => (false, None),
            SessionPhase::Answered { is_correct, .. } => (
                true,
                session
                    .current_answer()
                    .map(|a| (a.selected_answer.as_str(), is_correct)),
            ),
            SessionPhase::Finished => return None,
        };

        let options = order
            .iter()
            .map(|text| {
                let mark = match selected {
                    Some((chosen, true)) if chosen == text => OptionMark::Correct,
                    Some((chosen, false)) if chosen == text => OptionMark::Incorrect,
                    _ => OptionMark::Unmarked,
                };
                OptionView {
                    text: text.clone(),
                    mark,
                    enabled: !locked,
                }
            })
            .collect();

        Some(Self {
            index: session.current_index(),
            total: session.total(),
            prompt: question.prompt().to_string(),
            options,
            time_left: session.time_left(),
            locked,
        })
    }

    /// "3/10" style position label.
    #[must_use]
    pub fn counter_label(&self) -> String {
        format!("{}/{}", self.index + 1, self.total)
    }

    /// Share of the quiz reached, counting the current question.
    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let reached = (self.index + 1).min(self.total) * 100 / self.total;
        u32::try_from(reached).unwrap_or(100)
    }
}
