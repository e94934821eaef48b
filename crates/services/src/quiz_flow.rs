use tracing::{info, warn};

use quiz_core::model::{Category, EntryForm, Outcome, ResultSummary};
use quiz_core::session::QuizSession;
use storage::repository::QuizStorage;

use crate::Clock;
use crate::error::QuizError;
use crate::loader::QuestionBankLoader;

/// The finished quiz as the outcome page sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizResult {
    pub summary: ResultSummary,
    pub outcome: Outcome,
}

impl From<ResultSummary> for QuizResult {
    fn from(summary: ResultSummary) -> Self {
        Self {
            outcome: summary.outcome(),
            summary,
        }
    }
}

/// Page-to-page flow: entry form → quiz → outcome, with the handoff kept in
/// session storage.
#[derive(Clone)]
pub struct QuizFlowService {
    loader: QuestionBankLoader,
    storage: QuizStorage,
    clock: Clock,
}

impl QuizFlowService {
    #[must_use]
    pub fn new(loader: QuestionBankLoader, storage: QuizStorage, clock: Clock) -> Self {
        Self {
            loader,
            storage,
            clock,
        }
    }

    #[must_use]
    pub fn loader(&self) -> &QuestionBankLoader {
        &self.loader
    }

    /// Category names offered on the entry page.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Load` if the question document cannot be fetched.
    pub async fn categories(&self) -> Result<Vec<String>, QuizError> {
        let bank = self.loader.fetch_bank().await?;
        Ok(bank.category_names())
    }

    /// Validate the entry form, load the chosen category and hand it to the quiz page.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Entry` for invalid input (nothing is fetched then),
    /// `QuizError::Load` if the category cannot be loaded, and
    /// `QuizError::Storage` if the handoff cannot be written.
    pub async fn start_quiz(&self, form: &EntryForm) -> Result<Category, QuizError> {
        let entry = form.validate()?;
        let category = self.loader.load_category(&entry.category).await?;

        self.storage.clear().await?;
        self.storage.save_user_name(&entry.name).await?;
        self.storage.save_category(&category.name).await?;
        self.storage.save_questions(&category.questions).await?;

        info!(
            category = %category.name,
            questions = category.questions.len(),
            "quiz handed off"
        );
        Ok(category)
    }

    /// Rebuild a fresh session from the stored handoff.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoActiveQuiz` when the questions or the category
    /// were not handed off.
    pub async fn resume(&self) -> Result<QuizSession, QuizError> {
        let questions = self.storage.questions().await?.filter(|q| !q.is_empty());
        let category = self
            .storage
            .category()
            .await?
            .filter(|name| !name.trim().is_empty());
        let (Some(questions), Some(category)) = (questions, category) else {
            warn!("quiz page opened without a handoff");
            return Err(QuizError::NoActiveQuiz);
        };
        Ok(QuizSession::new(category, questions, self.clock.now())?)
    }

    /// Tally `session`, pick the outcome and store the summary for the outcome page.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` if the session is not finished.
    pub async fn finish(&self, session: &QuizSession) -> Result<QuizResult, QuizError> {
        let summary = session.result_summary()?;
        self.storage.save_results(&summary).await?;
        let result = QuizResult::from(summary);
        info!(
            session_id = %session.id(),
            percentage = summary.percentage(),
            outcome = result.outcome.as_str(),
            "results stored"
        );
        Ok(result)
    }

    /// # Errors
    ///
    /// Returns `QuizError::NoActiveQuiz` if no result was stored.
    pub async fn results(&self) -> Result<QuizResult, QuizError> {
        self.storage
            .results()
            .await?
            .map(QuizResult::from)
            .ok_or(QuizError::NoActiveQuiz)
    }

    /// # Errors
    ///
    /// Returns `QuizError::Storage` if the backend fails.
    pub async fn user_name(&self) -> Result<Option<String>, QuizError> {
        Ok(self.storage.user_name().await?)
    }

    /// Forget the current quiz ("try again").
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` if the backend fails.
    pub async fn reset(&self) -> Result<(), QuizError> {
        self.storage.clear().await?;
        info!("quiz reset");
        Ok(())
    }
}
