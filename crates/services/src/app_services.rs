use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::loader::{QuestionBankLoader, QuestionSource};
use crate::quiz_flow::QuizFlowService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    quiz_flow: Arc<QuizFlowService>,
}

impl AppServices {
    /// Build services backed by `SQLite` session storage.
    ///
    /// Any handoff left in the store by an earlier run is dropped, so every
    /// launch starts on a clean entry page.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        store_url: &str,
        source: QuestionSource,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(store_url).await?;
        let services = Self::from_storage(&storage, source, clock);
        services.quiz_flow.reset().await?;
        Ok(services)
    }

    /// Build services over an in-memory session store.
    #[must_use]
    pub fn in_memory(source: QuestionSource, clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(), source, clock)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, source: QuestionSource, clock: Clock) -> Self {
        let loader = QuestionBankLoader::new(source);
        let quiz_flow = Arc::new(QuizFlowService::new(loader, storage.quiz(), clock));
        Self { clock, quiz_flow }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn quiz_flow(&self) -> Arc<QuizFlowService> {
        Arc::clone(&self.quiz_flow)
    }
}
