//! Lookup limits and runtime configuration
//!
//! The presentation limits (meanings, senses, word length, TTL) live here as
//! named constants so the normalizer and cache never hard-code them.
//! `LookupConfig` carries the values that may change per run: provider URL,
//! cache location and TTL.

use std::env;
use std::path::PathBuf;
use std::time::Duration as StdDuration;

use chrono::Duration;

/// Maximum number of meanings kept per definition
pub const MAX_MEANINGS: usize = 3;

/// Maximum number of senses kept per meaning
pub const MAX_SENSES: usize = 3;

/// Words of this many characters or more are rejected
pub const MAX_WORD_LEN: usize = 50;

/// Time-to-live for cached definitions in hours
pub const CACHE_TTL_HOURS: i64 = 24;

/// In-page selections spanning more tokens than this are treated as sentences
pub const MAX_SELECTION_TOKENS: usize = 3;

/// Base URL of the free dictionary API
pub const DEFAULT_API_BASE_URL: &str = "https://api.dictionaryapi.dev";

/// Project name used for XDG directories and the log file
pub const APP_NAME: &str = "quickdef";

/// Runtime configuration for the lookup pipeline
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Provider base URL (without the `/api/v2/...` path)
    pub api_base_url: String,
    /// Directory for the durable store, `None` selects the XDG cache dir
    pub cache_dir: Option<PathBuf>,
    /// Whether definitions are persisted between runs
    pub cache_enabled: bool,
    /// How long a cached definition stays fresh
    pub cache_ttl: Duration,
    /// Request timeout handed to the HTTP client, if any
    pub request_timeout: Option<StdDuration>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            cache_dir: None,
            cache_enabled: true,
            cache_ttl: Duration::hours(CACHE_TTL_HOURS),
            request_timeout: None,
        }
    }
}

impl LookupConfig {
    /// Builds a configuration from `QUICKDEF_*` environment variables.
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_base_url = env::var("QUICKDEF_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.api_base_url);

        let cache_dir = env::var("QUICKDEF_CACHE_DIR").ok().map(PathBuf::from);

        let cache_ttl = env::var("QUICKDEF_CACHE_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|hours| *hours >= 0)
            .map(Duration::hours)
            .unwrap_or(defaults.cache_ttl);

        let request_timeout = env::var("QUICKDEF_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(StdDuration::from_secs);

        Self {
            api_base_url,
            cache_dir,
            cache_enabled: defaults.cache_enabled,
            cache_ttl,
            request_timeout,
        }
    }
}
