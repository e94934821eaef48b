#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{InMemorySessionStore, QuizStorage, SessionKey, SessionStore, Storage, StorageError};
