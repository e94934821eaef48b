mod entry_vm;
mod outcome_vm;
mod quiz_vm;
mod time_fmt;

pub use entry_vm::{EntryFeedback, load_categories, submit_entry};
pub use outcome_vm::{OutcomeVm, StatRow, load_outcome, map_outcome};
pub use quiz_vm::{QuizIntent, QuizOutcome, QuizVm, finish_quiz, session_to_finish, start_quiz};
pub use time_fmt::format_countdown;
