use quiz_core::model::{EntryError, EntryField, EntryForm};
use services::{QuizError, QuizFlowService};

use crate::views::ViewError;

/// Messages shown on the entry page after a rejected submit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryFeedback {
    pub name_error: Option<&'static str>,
    pub category_error: Option<&'static str>,
    pub banner: Option<ViewError>,
}

impl EntryFeedback {
    #[must_use]
    pub fn from_entry(err: &EntryError) -> Self {
        Self {
            name_error: err.message_for(EntryField::Name),
            category_error: err.message_for(EntryField::Category),
            banner: None,
        }
    }

    #[must_use]
    pub fn from_quiz(err: &QuizError) -> Self {
        match err {
            QuizError::Entry(entry) => Self::from_entry(entry),
            other => Self {
                banner: Some(ViewError::from_quiz(other)),
                ..Self::default()
            },
        }
    }

    /// Drop the inline message for `field` once the user edits it.
    pub fn clear_field(&mut self, field: EntryField) {
        match field {
            EntryField::Name => self.name_error = None,
            EntryField::Category => self.category_error = None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name_error.is_none() && self.category_error.is_none() && self.banner.is_none()
    }
}

/// Validate and hand the chosen category to the quiz page.
///
/// # Errors
///
/// Returns the feedback to render when validation or loading fails.
pub async fn submit_entry(
    flow: &QuizFlowService,
    name: &str,
    category: Option<String>,
) -> Result<(), EntryFeedback> {
    let form = EntryForm::new(name, category);
    flow.start_quiz(&form)
        .await
        .map(|_| ())
        .map_err(|err| EntryFeedback::from_quiz(&err))
}

/// Category names for the picker.
///
/// # Errors
///
/// Returns `ViewError::LoadFailed` if the question document cannot be read.
pub async fn load_categories(flow: &QuizFlowService) -> Result<Vec<String>, ViewError> {
    flow.categories()
        .await
        .map_err(|err| ViewError::from_quiz(&err))
}
