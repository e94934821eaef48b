#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod loader;
pub mod presenter;
pub mod quiz_flow;
pub mod runner;
pub mod timer;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, LoadError, QuizError};
pub use loader::{QuestionBankLoader, QuestionSource};
pub use presenter::{OptionMark, OptionView, QuestionView, shuffled_options};
pub use quiz_flow::{QuizFlowService, QuizResult};
pub use runner::{QuizRunner, Step};
pub use timer::{QuestionTimer, TimerSignal, TimerSignals};
