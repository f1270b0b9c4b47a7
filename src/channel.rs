//! Lookup request channel between popup surfaces and the lookup service
//!
//! Surfaces hold a cloneable [`LookupHandle`] and send
//! `{ "action": "fetchDefinition", "word": ... }` requests; a background
//! worker answers each one with `{ "success": true, "data": ... }` or
//! `{ "success": false, "error": ... }`. Every request is served on its own
//! task so two surfaces never wait on each other.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::data::Definition;
use crate::lookup::{LookupError, LookupService};

/// Capacity of the request queue
const REQUEST_QUEUE_SIZE: usize = 32;

/// Requests understood by the lookup worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum LookupRequest {
    /// Look up a raw, unvalidated word
    #[serde(rename = "fetchDefinition")]
    FetchDefinition { word: String },
}

/// Answer to a [`LookupRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Definition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LookupResponse {
    pub fn ok(data: Definition) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Converts the wire shape back into a result.
    ///
    /// A response claiming success without data, or failure without a
    /// message, yields a generic failure message.
    pub fn into_result(self) -> Result<Definition, String> {
        match (self.success, self.data, self.error) {
            (true, Some(data), _) => Ok(data),
            (false, _, Some(error)) if !error.is_empty() => Err(error),
            _ => Err("Failed to fetch definition".to_string()),
        }
    }
}

impl From<Result<Definition, LookupError>> for LookupResponse {
    fn from(result: Result<Definition, LookupError>) -> Self {
        match result {
            Ok(definition) => LookupResponse::ok(definition),
            Err(e) => LookupResponse::err(e.user_message()),
        }
    }
}

/// Runs a single request against the service
pub async fn dispatch(service: &LookupService, request: LookupRequest) -> LookupResponse {
    match request {
        LookupRequest::FetchDefinition { word } => service.lookup(&word).await.into(),
    }
}

struct Envelope {
    request: LookupRequest,
    reply: oneshot::Sender<LookupResponse>,
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

/// Cloneable sender side of the lookup channel
#[derive(Debug, Clone)]
pub struct LookupHandle {
    sender: mpsc::Sender<Envelope>,
}

impl LookupHandle {
    /// Sends a request and waits for its response.
    ///
    /// If the worker has stopped the response is a failure rather than an
    /// error, so callers only ever deal with the response shape.
    pub async fn send(&self, request: LookupRequest) -> LookupResponse {
        let (reply, response) = oneshot::channel();

        if self.sender.send(Envelope { request, reply }).await.is_err() {
            tracing::error!("lookup worker is not running");
            return LookupResponse::err("Lookup service unavailable");
        }

        response
            .await
            .unwrap_or_else(|_| LookupResponse::err("Lookup service unavailable"))
    }

    /// Shorthand for a `fetchDefinition` request
    pub async fn fetch_definition(&self, word: &str) -> LookupResponse {
        self.send(LookupRequest::FetchDefinition {
            word: word.to_string(),
        })
        .await
    }

    /// Handles a request given as raw JSON
    pub async fn send_json(&self, raw: &str) -> LookupResponse {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => return LookupResponse::err(format!("Malformed request: {e}")),
        };

        let action = value
            .get("action")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        match serde_json::from_value::<LookupRequest>(value) {
            Ok(request) => self.send(request).await,
            Err(_) if action != "fetchDefinition" => {
                LookupResponse::err(format!("Unknown action: {action}"))
            }
            Err(e) => LookupResponse::err(format!("Malformed request: {e}")),
        }
    }
}

/// Spawns the lookup worker.
///
/// The worker stops once every [`LookupHandle`] has been dropped.
pub fn spawn_lookup_worker(service: LookupService) -> (LookupHandle, JoinHandle<()>) {
    let (sender, mut receiver) = mpsc::channel::<Envelope>(REQUEST_QUEUE_SIZE);

    let worker = tokio::spawn(async move {
        while let Some(Envelope { request, reply }) = receiver.recv().await {
            let service = service.clone();
            tokio::spawn(async move {
                let response = dispatch(&service, request).await;
                // The requesting surface may have gone away; nothing to do then
                let _ = reply.send(response);
            });
        }
        tracing::debug!("lookup worker stopped");
    });

    (LookupHandle { sender }, worker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{DefinitionCache, MemoryStore};
    use crate::data::{DefinitionProvider, FetchError, Word};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct EchoProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DefinitionProvider for EchoProvider {
        async fn fetch_entries(&self, word: &Word) -> Result<Value, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if word.as_str() == "missing" {
                return Err(FetchError::NotFound);
            }
            Ok(json!([{ "word": word.as_str() }]))
        }
    }

    fn spawn_with_store() -> (LookupHandle, Arc<EchoProvider>, Arc<MemoryStore>) {
        let provider = Arc::new(EchoProvider {
            calls: AtomicUsize::new(0),
        });
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(DefinitionCache::new(store.clone()));
        let service = LookupService::new(provider.clone(), cache);
        let (handle, _worker) = spawn_lookup_worker(service);
        (handle, provider, store)
    }

    fn spawn() -> (LookupHandle, Arc<EchoProvider>) {
        let (handle, provider, _store) = spawn_with_store();
        (handle, provider)
    }

    #[test]
    fn test_request_wire_format() {
        let request = LookupRequest::FetchDefinition {
            word: "hello".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "action": "fetchDefinition", "word": "hello" })
        );
    }

    #[test]
    fn test_response_wire_format() {
        let failure = LookupResponse::err("Invalid word format");
        assert_eq!(
            serde_json::to_value(&failure).unwrap(),
            json!({ "success": false, "error": "Invalid word format" })
        );

        let success: LookupResponse = serde_json::from_value(json!({
            "success": true,
            "data": { "word": "hi", "phonetic": "", "meanings": [] }
        }))
        .unwrap();
        assert_eq!(success.into_result().unwrap().word, "hi");
    }

    #[test]
    fn test_inconsistent_response_is_generic_failure() {
        let response = LookupResponse {
            success: true,
            data: None,
            error: None,
        };
        assert_eq!(
            response.into_result(),
            Err("Failed to fetch definition".to_string())
        );
    }

    #[tokio::test]
    async fn test_fetch_definition_success() {
        let (handle, _provider) = spawn();

        let response = handle.fetch_definition("Hello").await;

        assert!(response.success);
        assert_eq!(response.data.unwrap().word, "hello");
    }

    #[tokio::test]
    async fn test_failures_are_tagged_responses() {
        let (handle, provider) = spawn();

        let invalid = handle.fetch_definition("h3llo").await;
        assert_eq!(invalid, LookupResponse::err("Invalid word format"));

        let missing = handle.fetch_definition("missing").await;
        assert_eq!(missing, LookupResponse::err("No definition found for this word"));

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_two_surfaces_share_the_worker() {
        let (content, provider, store) = spawn_with_store();
        let toolbar = content.clone();

        let (a, b) = tokio::join!(
            content.fetch_definition("apple"),
            toolbar.fetch_definition("banana")
        );

        assert_eq!(a.data.unwrap().word, "apple");
        assert_eq!(b.data.unwrap().word, "banana");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);

        while store.len() < 2 {
            tokio::task::yield_now().await;
        }

        // Served from the shared cache
        let again = toolbar.fetch_definition("APPLE").await;
        assert!(again.success);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_send_json() {
        let (handle, _provider) = spawn();

        let ok = handle
            .send_json(r#"{"action":"fetchDefinition","word":"tree"}"#)
            .await;
        assert!(ok.success);

        let unknown = handle.send_json(r#"{"action":"explode"}"#).await;
        assert_eq!(unknown, LookupResponse::err("Unknown action: explode"));

        let malformed = handle.send_json("{").await;
        assert!(!malformed.success);
    }
}
