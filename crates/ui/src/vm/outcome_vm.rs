use quiz_core::model::Outcome;
use services::{QuizFlowService, QuizResult};

use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatRow {
    pub label: &'static str,
    pub value: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutcomeVm {
    pub outcome: Outcome,
    pub heading: &'static str,
    pub greeting: String,
    pub score_label: String,
    pub rows: Vec<StatRow>,
}

impl OutcomeVm {
    /// The page these results belong on, if `page` is not it.
    #[must_use]
    pub fn redirect_from(&self, page: Outcome) -> Option<Outcome> {
        (self.outcome != page).then_some(self.outcome)
    }
}

fn heading_for(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Poor => "Keep practicing",
        Outcome::Average => "Good effort",
        Outcome::Success => "Excellent work",
    }
}

#[must_use]
pub fn map_outcome(result: QuizResult, user_name: Option<&str>) -> OutcomeVm {
    let summary = result.summary;
    let greeting = match user_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => format!("Well played, {name}!"),
        None => "Well played!".to_string(),
    };
    OutcomeVm {
        outcome: result.outcome,
        heading: heading_for(result.outcome),
        greeting,
        score_label: format!("{}%", summary.percentage()),
        rows: vec![
            StatRow {
                label: "Total questions",
                value: summary.total(),
            },
            StatRow {
                label: "Correct",
                value: summary.correct(),
            },
            StatRow {
                label: "Incorrect",
                value: summary.incorrect(),
            },
            StatRow {
                label: "Unanswered",
                value: summary.unanswered(),
            },
        ],
    }
}

/// # Errors
///
/// Returns `ViewError::NoActiveQuiz` when no result was stored.
pub async fn load_outcome(flow: &QuizFlowService) -> Result<OutcomeVm, ViewError> {
    let result = flow
        .results()
        .await
        .map_err(|err| ViewError::from_quiz(&err))?;
    let user_name = flow
        .user_name()
        .await
        .map_err(|err| ViewError::from_quiz(&err))?;
    Ok(map_outcome(result, user_name.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::ResultSummary;

    #[test]
    fn maps_summary_rows() {
        let summary = ResultSummary::new(5, 3, 1, 1).unwrap();
        let vm = map_outcome(QuizResult::from(summary), Some(" Ada "));
        assert_eq!(vm.outcome, Outcome::Average);
        assert_eq!(vm.heading, "Good effort");
        assert_eq!(vm.greeting, "Well played, Ada!");
        assert_eq!(vm.score_label, "60%");
        let values: Vec<u32> = vm.rows.iter().map(|row| row.value).collect();
        assert_eq!(values, vec![5, 3, 1, 1]);
    }

    #[test]
    fn missing_name_uses_plain_greeting() {
        let summary = ResultSummary::new(4, 4, 0, 0).unwrap();
        let vm = map_outcome(QuizResult::from(summary), None);
        assert_eq!(vm.outcome, Outcome::Success);
        assert_eq!(vm.greeting, "Well played!");
    }

    #[test]
    fn results_opened_on_another_band_point_to_their_own() {
        let summary = ResultSummary::new(5, 1, 4, 0).unwrap();
        let vm = map_outcome(QuizResult::from(summary), None);
        assert_eq!(vm.outcome, Outcome::Poor);
        assert_eq!(vm.redirect_from(Outcome::Success), Some(Outcome::Poor));
        assert_eq!(vm.redirect_from(Outcome::Average), Some(Outcome::Poor));
        assert_eq!(vm.redirect_from(Outcome::Poor), None);
    }
}
