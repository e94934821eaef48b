use serde::{Deserialize, Serialize};

/// The logged result of one answered question. Timeouts and skips produce none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    #[serde(rename = "question")]
    pub question_prompt: String,
    #[serde(rename = "selectedAnswer")]
    pub selected_answer: String,
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
}

impl AnswerRecord {
    #[must_use]
    pub fn new(
        question_prompt: impl Into<String>,
        selected_answer: impl Into<String>,
        is_correct: bool,
    ) -> Self {
        Self {
            question_prompt: question_prompt.into(),
            selected_answer: selected_answer.into(),
            is_correct,
        }
    }
}
