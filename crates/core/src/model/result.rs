use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResultError {
    #[error("a quiz result needs at least one question")]
    Empty,

    #[error("total questions ({total}) does not match outcome counts ({sum})")]
    CountMismatch { total: u32, sum: u32 },

    #[error("stored percentage {stored} does not match counts ({expected})")]
    PercentageMismatch { stored: u32, expected: u32 },
}

/// Rounded share of `correct` in `total`, as a whole percentage.
///
/// Halves round up, so 59.5% becomes 60%.
///
/// # Errors
///
/// Returns `ResultError::Empty` when `total` is zero.
pub fn percentage(correct: u32, total: u32) -> Result<u32, ResultError> {
    if total == 0 {
        return Err(ResultError::Empty);
    }
    let correct = u64::from(correct.min(total));
    let total = u64::from(total);
    let rounded = (correct * 200 + total) / (total * 2);
    Ok(u32::try_from(rounded).unwrap_or(100))
}

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// Score band that decides which result page is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Below 60%.
    Poor,
    /// 60% up to, but not including, 80%.
    Average,
    /// 80% and above.
    Success,
}

impl Outcome {
    pub const AVERAGE_THRESHOLD: u32 = 60;
    pub const SUCCESS_THRESHOLD: u32 = 80;

    #[must_use]
    pub fn from_percentage(percentage: u32) -> Self {
        if percentage < Self::AVERAGE_THRESHOLD {
            Self::Poor
        } else if percentage < Self::SUCCESS_THRESHOLD {
            Self::Average
        } else {
            Self::Success
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Poor => "poor",
            Self::Average => "average",
            Self::Success => "success",
        }
    }
}

//
// ─── SUMMARY ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResultRecord {
    score: u32,
    #[serde(rename = "totalQuestions")]
    total_questions: u32,
    #[serde(rename = "correctAnswers")]
    correct_answers: u32,
    #[serde(rename = "incorrectAnswers")]
    incorrect_answers: u32,
    unanswered: u32,
}

/// Final tally of a completed quiz. Write-once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ResultRecord", into = "ResultRecord")]
pub struct ResultSummary {
    percentage: u32,
    total: u32,
    correct: u32,
    incorrect: u32,
    unanswered: u32,
}

impl ResultSummary {
    /// Build a summary from outcome counts.
    ///
    /// # Errors
    ///
    /// Returns `ResultError::Empty` for a zero-question quiz and
    /// `ResultError::CountMismatch` if the counts do not add up to `total`.
    pub fn new(
        total: u32,
        correct: u32,
        incorrect: u32,
        unanswered: u32,
    ) -> Result<Self, ResultError> {
        let sum = correct
            .saturating_add(incorrect)
            .saturating_add(unanswered);
        if sum != total {
            return Err(ResultError::CountMismatch { total, sum });
        }
        Ok(Self {
            percentage: percentage(correct, total)?,
            total,
            correct,
            incorrect,
            unanswered,
        })
    }

    #[must_use]
    pub fn percentage(&self) -> u32 {
        self.percentage
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn unanswered(&self) -> u32 {
        self.unanswered
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        Outcome::from_percentage(self.percentage)
    }
}

impl TryFrom<ResultRecord> for ResultSummary {
    type Error = ResultError;

    fn try_from(record: ResultRecord) -> Result<Self, Self::Error> {
        let summary = Self::new(
            record.total_questions,
            record.correct_answers,
            record.incorrect_answers,
            record.unanswered,
        )?;
        if summary.percentage != record.score {
            return Err(ResultError::PercentageMismatch {
                stored: record.score,
                expected: summary.percentage,
            });
        }
        Ok(summary)
    }
}

impl From<ResultSummary> for ResultRecord {
    fn from(summary: ResultSummary) -> Self {
        Self {
            score: summary.percentage,
            total_questions: summary.total,
            correct_answers: summary.correct,
            incorrect_answers: summary.incorrect,
            unanswered: summary.unanswered,
        }
    }
}
