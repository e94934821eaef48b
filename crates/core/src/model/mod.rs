mod answer;
mod entry;
mod ids;
mod question;
mod result;

pub use answer::AnswerRecord;
pub use entry::{
    CATEGORY_MESSAGE, EntryError, EntryField, EntryForm, FieldError, MIN_NAME_CHARS, NAME_MESSAGE,
    ValidEntry,
};
pub use ids::SessionId;
pub use question::{Category, Question, QuestionBank, QuestionError};
pub use result::{Outcome, ResultError, ResultSummary, percentage};
