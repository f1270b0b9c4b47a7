//! Durable key-value stores backing the definition cache
//!
//! `FileStore` persists each key as a JSON file in an XDG-compliant cache
//! directory; `MemoryStore` keeps everything in process and is used when
//! persistence is disabled and in tests.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use directories::ProjectDirs;
use serde_json::Value;
use thiserror::Error;
use tokio::fs;

use crate::config::APP_NAME;

/// Errors raised by a durable store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("Store I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The stored value could not be (de)serialized
    #[error("Stored value is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),

    /// The store cannot be used at all
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous key-value store used for persistence beyond process lifetime
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Returns the stored value for `key`, or `None` if absent
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError>;
}

/// Stores values as JSON files on disk
///
/// Uses `~/.cache/quickdef/` on Linux, or the equivalent XDG path on other
/// platforms. Keys are escaped into file names so that any key is safe.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where store files are kept
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store in the XDG cache directory.
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", APP_NAME)?;
        Some(Self {
            dir: project_dirs.cache_dir().to_path_buf(),
        })
    }

    /// Creates a store in a custom directory
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the store writes into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path to the file holding `key`
    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }
}

/// Escapes a key into a file stem.
///
/// ASCII alphanumerics and `-` pass through; every other byte becomes `_XX`.
fn file_stem(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("_{:02x}", byte));
        }
    }
    stem
}

#[async_trait]
impl DurableStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let content = match fs::read_to_string(self.path_for(key)).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string_pretty(value)?;
        fs::write(self.path_for(key), json).await?;
        Ok(())
    }
}

/// In-memory store, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))?;
        entries.insert(key.to_string(), value.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileStore::with_dir(temp_dir.path());
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_set_creates_file_in_store_directory() {
        let (store, temp_dir) = create_test_store();

        store
            .set("definition-hello", &json!({ "word": "hello" }))
            .await
            .expect("Write should succeed");

        let expected_path = temp_dir.path().join("definition-hello.json");
        assert!(expected_path.exists(), "Store file should exist");

        let content = std_fs::read_to_string(&expected_path).expect("Should read file");
        assert!(content.contains("\"word\""));
        assert!(content.contains("\"hello\""));
    }

    #[tokio::test]
    async fn test_get_returns_none_for_missing_key() {
        let (store, _temp_dir) = create_test_store();
        let result = store.get("nonexistent").await.expect("Read should succeed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_get_reports_corrupt_file() {
        let (store, temp_dir) = create_test_store();
        std_fs::write(temp_dir.path().join("broken.json"), "{not json").unwrap();

        let result = store.get("broken").await;
        assert!(matches!(result, Err(StoreError::Serde(_))));
    }

    #[tokio::test]
    async fn test_set_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested_path = temp_dir.path().join("nested").join("store");
        let store = FileStore::with_dir(&nested_path);

        store.set("key", &json!(1)).await.expect("Write should succeed");

        assert!(nested_path.join("key.json").exists());
    }

    #[tokio::test]
    async fn test_overwrite_existing_value() {
        let (store, _temp_dir) = create_test_store();

        store.set("key", &json!("first")).await.unwrap();
        store.set("key", &json!("second")).await.unwrap();

        assert_eq!(store.get("key").await.unwrap(), Some(json!("second")));
    }

    #[tokio::test]
    async fn test_keys_with_spaces_and_apostrophes_stay_distinct() {
        let (store, _temp_dir) = create_test_store();

        store.set("ice cream", &json!(1)).await.unwrap();
        store.set("ice-cream", &json!(2)).await.unwrap();
        store.set("don't", &json!(3)).await.unwrap();

        assert_eq!(store.get("ice cream").await.unwrap(), Some(json!(1)));
        assert_eq!(store.get("ice-cream").await.unwrap(), Some(json!(2)));
        assert_eq!(store.get("don't").await.unwrap(), Some(json!(3)));
    }

    #[test]
    fn test_file_stem_escaping() {
        assert_eq!(file_stem("hello"), "hello");
        assert_eq!(file_stem("ice cream"), "ice_20cream");
        assert_eq!(file_stem("a/b"), "a_2fb");
    }

    #[test]
    fn test_new_creates_xdg_compliant_path() {
        if let Some(store) = FileStore::new() {
            let path_str = store.dir().to_string_lossy();
            assert!(path_str.contains("quickdef"), "Store path should contain project name");
        }
        // Test passes if new() returns None (e.g., no home directory in CI)
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("key", &json!({ "a": 1 })).await.unwrap();

        assert_eq!(store.get("key").await.unwrap(), Some(json!({ "a": 1 })));
        assert_eq!(store.len(), 1);
    }
}
