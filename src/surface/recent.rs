//! Most recent toolbar search
//!
//! The toolbar remembers the last word that produced a definition and uses
//! it as the search box placeholder next time. Storage failures are logged
//! and otherwise ignored.

use std::sync::Arc;

use serde_json::Value;

use crate::cache::DurableStore;

/// Store key for the most recent toolbar search
pub const RECENT_SEARCH_KEY: &str = "recent-search";

const DEFAULT_PLACEHOLDER: &str = "Enter a word...";

/// Placeholder text for the toolbar search box
pub fn placeholder_text(recent: Option<&str>) -> String {
    match recent {
        Some(word) if !word.is_empty() => format!("Try \"{word}\" or enter a new word..."),
        _ => DEFAULT_PLACEHOLDER.to_string(),
    }
}

/// Reads and writes the most recent toolbar search
#[derive(Clone)]
pub struct RecentSearch {
    store: Arc<dyn DurableStore>,
}

impl std::fmt::Debug for RecentSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentSearch").finish_non_exhaustive()
    }
}

impl RecentSearch {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Option<String> {
        match self.store.get(RECENT_SEARCH_KEY).await {
            Ok(Some(Value::String(word))) => Some(word),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load recent search");
                None
            }
        }
    }

    pub async fn save(&self, word: &str) {
        if let Err(e) = self
            .store
            .set(RECENT_SEARCH_KEY, &Value::String(word.to_string()))
            .await
        {
            tracing::warn!(error = %e, "failed to save recent search");
        }
    }
}
