//! Time-bounded definition cache
//!
//! Entries are written through to a [`DurableStore`] together with the time
//! they were stored. Staleness is checked lazily on read: an expired entry
//! behaves as a miss and stays on disk until the next `put` overwrites it.
//! Store failures never reach the caller; they are logged and the cache
//! degrades to a miss.

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::store::DurableStore;
use crate::config::CACHE_TTL_HOURS;
use crate::data::{Definition, Word};

/// Source of the current time, injectable for TTL tests
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock forward by `by`
    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|now| *now).unwrap_or_else(|_| Utc::now())
    }
}

/// Wrapper stored for each cached word
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheEntry {
    word: Word,
    data: Definition,
    stored_at: DateTime<Utc>,
}

/// Process-wide cache of normalized definitions
pub struct DefinitionCache {
    store: Arc<dyn DurableStore>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for DefinitionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinitionCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl DefinitionCache {
    /// Creates a cache with the default 24 hour TTL
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self {
            store,
            ttl: Duration::hours(CACHE_TTL_HOURS),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store key for a word; words are already lower-cased
    fn key(word: &Word) -> String {
        format!("definition-{}", word.as_str())
    }

    /// Returns the cached definition if it is younger than the TTL
    pub async fn get(&self, word: &Word) -> Option<Definition> {
        let raw = match self.store.get(&Self::key(word)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(word = %word, error = %e, "cache read failed");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_value(raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(word = %word, error = %e, "ignoring unreadable cache entry");
                return None;
            }
        };

        let age = self.clock.now() - entry.stored_at;
        if age < self.ttl {
            Some(entry.data)
        } else {
            tracing::debug!(word = %word, age_secs = age.num_seconds(), "cache entry expired");
            None
        }
    }

    /// Stores `data` for `word`, stamped with the current time.
    ///
    /// Overwrites any existing entry. Persistence failures are logged only.
    pub async fn put(&self, word: &Word, data: &Definition) {
        let entry = CacheEntry {
            word: word.clone(),
            data: data.clone(),
            stored_at: self.clock.now(),
        };

        let value = match serde_json::to_value(&entry) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(word = %word, error = %e, "failed to encode cache entry");
                return;
            }
        };

        if let Err(e) = self.store.set(&Self::key(word), &value).await {
            tracing::warn!(word = %word, error = %e, "cache write failed");
        }
    }
}
