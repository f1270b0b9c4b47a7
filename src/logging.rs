//! Log output setup
//!
//! One-shot runs log to stderr. The interactive popup owns the terminal, so
//! it always logs to a file: in the cache directory when there is one,
//! otherwise in the system temp directory.

use std::env;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use quickdef::config::APP_NAME;

/// Reasons a log subscriber could not be installed
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("could not open log file: {0}")]
    Io(#[from] io::Error),

    /// Only one global subscriber can exist per process
    #[error("a log subscriber is already installed")]
    AlreadyInstalled,
}

fn filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Directory for the interactive log file
pub fn log_dir(store_dir: Option<&Path>) -> PathBuf {
    match store_dir {
        Some(dir) => dir.to_path_buf(),
        None => env::temp_dir().join(APP_NAME),
    }
}

/// Logs to stderr
pub fn init_stderr(default_directive: &str) -> Result<(), LoggingError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(default_directive))
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInstalled)
}

/// Logs to `quickdef.log` inside `dir`
pub fn init_file(default_directive: &str, dir: &Path) -> Result<(), LoggingError> {
    fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(format!("{APP_NAME}.log")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(default_directive))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInstalled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_dir_prefers_cache_dir() {
        let cache = Path::new("/var/cache/quickdef");
        assert_eq!(log_dir(Some(cache)), cache);
    }

    #[test]
    fn test_log_dir_falls_back_to_temp_dir() {
        let dir = log_dir(None);
        assert!(dir.starts_with(env::temp_dir()));
        assert!(dir.ends_with(APP_NAME));
    }

    #[test]
    fn test_second_init_reports_existing_subscriber() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        // The subscriber is process-wide, so only the first install succeeds
        let _ = init_file("warn", temp_dir.path());
        assert!(temp_dir.path().join("quickdef.log").exists());

        assert!(matches!(
            init_stderr("warn"),
            Err(LoggingError::AlreadyInstalled)
        ));
    }
}
