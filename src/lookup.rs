//! Lookup orchestration
//!
//! `LookupService::lookup` runs validate → cache → fetch on miss → normalize
//! → write through. The write runs on its own task and is never awaited.
//! Each call performs at most one fetch and is independent of any other
//! in-flight call, including calls for the same word.

use std::fmt;
use std::mem;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::task::JoinSet;

use crate::cache::DefinitionCache;
use crate::data::{normalize, Definition, DefinitionProvider, FetchError, ValidationRules, Word};

/// Why a lookup found nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// The provider answered 404
    NoEntry,
    /// The provider answered 2xx without a usable entry
    EmptyPayload,
}

/// Per-lookup failures; none of them are fatal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The input was rejected by the validator
    #[error("Invalid word format")]
    InvalidWord,

    /// The provider was reachable but had no definition
    #[error("No definition found for this word")]
    NotFound { reason: NotFoundReason },

    /// The provider returned a non-success, non-404 status
    #[error("API error: {status}")]
    ProviderError { status: u16 },

    /// The provider could not be reached
    #[error("Network error: {0}")]
    NetworkError(String),
}

impl LookupError {
    /// Message shown inside an error popup
    pub fn user_message(&self) -> String {
        match self {
            LookupError::InvalidWord => "Invalid word format".to_string(),
            LookupError::NotFound {
                reason: NotFoundReason::NoEntry,
            } => "No definition found for this word".to_string(),
            LookupError::NotFound {
                reason: NotFoundReason::EmptyPayload,
            } => "No definition found".to_string(),
            LookupError::ProviderError { status } => format!("API error: {status}"),
            LookupError::NetworkError(_) => {
                "Network error occurred. Please check your connection.".to_string()
            }
        }
    }
}

impl From<FetchError> for LookupError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound => LookupError::NotFound {
                reason: NotFoundReason::NoEntry,
            },
            FetchError::Status(status) => LookupError::ProviderError { status },
            FetchError::Network(message) => LookupError::NetworkError(message),
        }
    }
}

/// Shared lookup pipeline used by every surface
#[derive(Clone)]
pub struct LookupService {
    provider: Arc<dyn DefinitionProvider>,
    cache: Arc<DefinitionCache>,
    rules: ValidationRules,
    /// Cache writes still running in the background
    pending_writes: Arc<Mutex<JoinSet<()>>>,
}

impl fmt::Debug for LookupService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupService")
            .field("cache", &self.cache)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl LookupService {
    pub fn new(provider: Arc<dyn DefinitionProvider>, cache: Arc<DefinitionCache>) -> Self {
        Self {
            provider,
            cache,
            rules: ValidationRules::standard(),
            pending_writes: Arc::default(),
        }
    }

    /// Replaces the validation rules applied to every lookup
    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn cache(&self) -> &Arc<DefinitionCache> {
        &self.cache
    }

    /// Waits for every background cache write started so far
    pub async fn flush_writes(&self) {
        let mut writes = match self.pending_writes.lock() {
            Ok(mut writes) => mem::take(&mut *writes),
            Err(_) => return,
        };
        while writes.join_next().await.is_some() {}
    }

    fn spawn_write(&self, word: Word, definition: Definition) {
        let cache = Arc::clone(&self.cache);
        let write = async move { cache.put(&word, &definition).await };
        match self.pending_writes.lock() {
            Ok(mut writes) => {
                while writes.try_join_next().is_some() {}
                writes.spawn(write);
            }
            Err(_) => {
                tokio::spawn(write);
            }
        }
    }

    /// Looks up the definition for `raw`.
    ///
    /// # Returns
    /// * `Ok(Definition)` from the cache or a fresh fetch
    /// * `Err(LookupError::InvalidWord)` before any cache or network access
    /// * `Err(LookupError::NotFound)` on 404 or an unusable payload
    /// * `Err(LookupError::ProviderError)` on any other non-2xx status
    /// * `Err(LookupError::NetworkError)` if the request never got a status
    pub async fn lookup(&self, raw: &str) -> Result<Definition, LookupError> {
        let word = Word::parse(raw, &self.rules).ok_or(LookupError::InvalidWord)?;

        if let Some(cached) = self.cache.get(&word).await {
            tracing::debug!(word = %word, "cache hit");
            return Ok(cached);
        }
        tracing::debug!(word = %word, "cache miss");

        let payload = self.provider.fetch_entries(&word).await.map_err(|e| {
            tracing::debug!(word = %word, error = %e, "fetch failed");
            LookupError::from(e)
        })?;

        let definition = normalize(&payload).map_err(|e| {
            tracing::debug!(word = %word, error = %e, "payload had no usable entry");
            LookupError::NotFound {
                reason: NotFoundReason::EmptyPayload,
            }
        })?;

        // Written in the background so a slow store never holds back the result
        self.spawn_write(word, definition.clone());
        Ok(definition)
    }
}
