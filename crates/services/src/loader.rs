use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use quiz_core::model::{Category, QuestionBank};

use crate::error::LoadError;

/// Where the static question document lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuestionSource {
    Remote(Url),
    File(PathBuf),
}

impl QuestionSource {
    /// Interpret `raw` as an `http(s)://` or `file://` URL, falling back to a plain path.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidSource` for blank input, unsupported URL
    /// schemes, or `file://` URLs that do not map to a local path.
    pub fn parse(raw: &str) -> Result<Self, LoadError> {
        let trimmed = raw.trim();
        let invalid = || LoadError::InvalidSource {
            raw: raw.to_string(),
        };
        if trimmed.is_empty() {
            return Err(invalid());
        }

        match Url::parse(trimmed) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(Self::Remote(url)),
                "file" => url.to_file_path().map(Self::File).map_err(|()| invalid()),
                // Single-letter schemes are Windows drive letters, not URLs.
                scheme if scheme.len() == 1 => Ok(Self::File(PathBuf::from(trimmed))),
                _ => Err(invalid()),
            },
            Err(_) => Ok(Self::File(PathBuf::from(trimmed))),
        }
    }
}

impl FromStr for QuestionSource {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for QuestionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetches the question document. One attempt per call; failures are not retried.
#[derive(Clone)]
pub struct QuestionBankLoader {
    client: Client,
    source: QuestionSource,
}

impl QuestionBankLoader {
    #[must_use]
    pub fn new(source: QuestionSource) -> Self {
        Self {
            client: Client::new(),
            source,
        }
    }

    #[must_use]
    pub fn source(&self) -> &QuestionSource {
        &self.source
    }

    /// Fetch and parse the whole document.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` on network, status, file, or parse failures.
    pub async fn fetch_bank(&self) -> Result<QuestionBank, LoadError> {
        debug!(source = %self.source, "fetching question bank");
        let result = match &self.source {
            QuestionSource::Remote(url) => self.fetch_remote(url).await,
            QuestionSource::File(path) => Self::read_file(path).await,
        };
        if let Err(err) = &result {
            warn!(source = %self.source, error = %err, "failed to load question bank");
        }
        result
    }

    async fn fetch_remote(&self, url: &Url) -> Result<QuestionBank, LoadError> {
        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(LoadError::HttpStatus(response.status()));
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn read_file(path: &Path) -> Result<QuestionBank, LoadError> {
        let body = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch the document and pick one category by case-insensitive name.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::UnknownCategory` if no category matches and
    /// `LoadError::EmptyCategory` if the match holds no questions, besides the
    /// failures of [`Self::fetch_bank`].
    pub async fn load_category(&self, name: &str) -> Result<Category, LoadError> {
        let bank = self.fetch_bank().await?;
        let category = bank
            .into_category(name)
            .ok_or_else(|| LoadError::UnknownCategory {
                name: name.to_string(),
            })?;
        if category.questions.is_empty() {
            return Err(LoadError::EmptyCategory {
                name: category.name,
            });
        }
        debug!(
            category = %category.name,
            questions = category.questions.len(),
            "category loaded"
        );
        Ok(category)
    }
}
