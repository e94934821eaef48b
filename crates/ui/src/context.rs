use std::sync::Arc;

use services::{Clock, QuizFlowService};

pub trait UiApp: Send + Sync {
    fn clock(&self) -> Clock;
    fn quiz_flow(&self) -> Arc<QuizFlowService>;
}

#[derive(Clone)]
pub struct AppContext {
    clock: Clock,
    quiz_flow: Arc<QuizFlowService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            clock: app.clock(),
            quiz_flow: app.quiz_flow(),
        }
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

// Provided by the composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
