//! Free Dictionary API client
//!
//! Fetches raw entries from `GET /api/v2/entries/en/{word}` and classifies
//! the HTTP outcome. Interpretation of the body is left to the normalizer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use thiserror::Error;

use super::Word;
use crate::config::DEFAULT_API_BASE_URL;

/// Errors that can occur when fetching entries from the provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The provider has no entry for the word (HTTP 404)
    #[error("No definition found for this word")]
    NotFound,

    /// The provider answered with a non-success, non-404 status
    #[error("API error: {0}")]
    Status(u16),

    /// The request failed before a status was obtained
    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

/// Source of raw dictionary entries
///
/// Implemented by [`DictionaryApiClient`] for the real API and by in-memory
/// fakes in tests.
#[async_trait]
pub trait DefinitionProvider: Send + Sync {
    /// Fetches the raw response body for `word`.
    ///
    /// A successful status with an unreadable body yields `Value::Null`,
    /// which the normalizer reports as an empty result.
    async fn fetch_entries(&self, word: &Word) -> Result<Value, FetchError>;
}

/// Client for the Free Dictionary API
#[derive(Debug, Clone)]
pub struct DictionaryApiClient {
    http_client: Client,
    /// Base URL for the API (allows override for testing)
    base_url: String,
}

impl Default for DictionaryApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionaryApiClient {
    /// Creates a client against the public API
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_BASE_URL)
    }

    /// Creates a client against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Rebuilds the HTTP client with a request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, FetchError> {
        self.http_client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// Builds the entry URL, percent-encoding the word as one path segment
    pub fn entry_url(&self, word: &Word) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FetchError::Network(format!("Invalid API URL '{}': {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| FetchError::Network(format!("Invalid API URL '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(["api", "v2", "entries", "en", word.as_str()]);

        Ok(url)
    }
}

#[async_trait]
impl DefinitionProvider for DictionaryApiClient {
    async fn fetch_entries(&self, word: &Word) -> Result<Value, FetchError> {
        let url = self.entry_url(word)?;
        tracing::debug!(%url, "fetching definition");

        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        tracing::debug!(word = %word, status = status.as_u16(), "provider responded");

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        match serde_json::from_str(&text) {
            Ok(body) => Ok(body),
            Err(e) => {
                tracing::warn!(word = %word, error = %e, "provider returned unreadable body");
                Ok(Value::Null)
            }
        }
    }
}
