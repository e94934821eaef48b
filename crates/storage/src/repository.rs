use async_trait::async_trait;
use quiz_core::model::{Question, ResultSummary};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Keys handed from one page of the quiz to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    UserName,
    Category,
    Questions,
    Results,
}

impl SessionKey {
    pub const ALL: [SessionKey; 4] = [
        SessionKey::UserName,
        SessionKey::Category,
        SessionKey::Questions,
        SessionKey::Results,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SessionKey::UserName => "quizUserName",
            SessionKey::Category => "quizCategory",
            SessionKey::Questions => "quizQuestions",
            SessionKey::Results => "quizResults",
        }
    }
}

/// Session-scoped string key/value storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: SessionKey) -> Result<Option<String>, StorageError>;

    /// Insert or replace a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set(&self, key: SessionKey, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: SessionKey) -> Result<(), StorageError>;
}

/// Simple in-memory store, the default for a single app session.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    entries: Arc<Mutex<HashMap<SessionKey, String>>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: SessionKey) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&key).cloned())
    }

    async fn set(&self, key: SessionKey, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key, value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: SessionKey) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&key);
        Ok(())
    }
}

/// Typed view over a [`SessionStore`]: JSON for structured values, plain text otherwise.
#[derive(Clone)]
pub struct QuizStorage {
    store: Arc<dyn SessionStore>,
}

impl QuizStorage {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    async fn put_json<T: Serialize + ?Sized>(
        &self,
        key: SessionKey,
        value: &T,
    ) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(key, &raw).await
    }

    async fn get_json<T: DeserializeOwned>(&self, key: SessionKey) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Serialization(format!("{}: {e}", key.as_str())))
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    pub async fn save_user_name(&self, name: &str) -> Result<(), StorageError> {
        self.store.set(SessionKey::UserName, name).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    pub async fn user_name(&self) -> Result<Option<String>, StorageError> {
        self.store.get(SessionKey::UserName).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    pub async fn save_category(&self, category: &str) -> Result<(), StorageError> {
        self.store.set(SessionKey::Category, category).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    pub async fn category(&self) -> Result<Option<String>, StorageError> {
        self.store.get(SessionKey::Category).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the backend fails.
    pub async fn save_questions(&self, questions: &[Question]) -> Result<(), StorageError> {
        self.put_json(SessionKey::Questions, questions).await
    }

    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored list is malformed.
    pub async fn questions(&self) -> Result<Option<Vec<Question>>, StorageError> {
        self.get_json(SessionKey::Questions).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the backend fails.
    pub async fn save_results(&self, summary: &ResultSummary) -> Result<(), StorageError> {
        self.put_json(SessionKey::Results, summary).await
    }

    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored summary is malformed.
    pub async fn results(&self) -> Result<Option<ResultSummary>, StorageError> {
        self.get_json(SessionKey::Results).await
    }

    /// Drop every quiz key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    pub async fn clear(&self) -> Result<(), StorageError> {
        for key in SessionKey::ALL {
            self.store.remove(key).await?;
        }
        Ok(())
    }
}

/// Aggregates the session store behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub session: Arc<dyn SessionStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let session: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        Self { session }
    }

    #[must_use]
    pub fn quiz(&self) -> QuizStorage {
        QuizStorage::new(Arc::clone(&self.session))
    }
}
