mod entry;
mod outcome;
mod quiz;
mod state;

pub use entry::EntryView;
pub use outcome::{AverageView, PoorView, ResultDetails, SuccessView};
pub use quiz::QuizView;
pub use state::{ViewError, ViewState, view_state_from_resource};

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
