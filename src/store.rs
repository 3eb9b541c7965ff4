//! Document store client.
//!
//! The store itself — parsing, embedding, indexing, persistence — is an
//! external service. This module only speaks its HTTP API: `add`,
//! `wait_processed`, `find`, `get`, `close`. Responses come back as raw
//! JSON; shape normalization happens at the ingestion and retrieval
//! boundaries, never here and never deeper.

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::config::StoreConfig;

/// Errors surfaced by store calls.
///
/// These are non-fatal at per-file and per-question boundaries; only a
/// failure to open the session at startup is treated as fatal.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store returned {code}: {body}")]
    Status { code: u16, body: String },
    #[error("could not decode store response: {0}")]
    Decode(String),
}

/// The store's operation surface, as this pipeline sees it.
///
/// One session owns exactly one implementation and issues a single
/// sequential stream of operations against it.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Add one file under an optional target namespace. Returns the raw
    /// response; the shape varies and is classified by the ingestor.
    async fn add(&self, path: &str, target: Option<&str>) -> Result<Value, StoreError>;

    /// Block until background embedding and indexing has finished.
    async fn wait_processed(&self) -> Result<(), StoreError>;

    /// Ranked semantic search, optionally scoped to a namespace subtree.
    async fn find(
        &self,
        query: &str,
        target_uri: Option<&str>,
        limit: usize,
    ) -> Result<Value, StoreError>;

    /// Fetch the raw full text of a resource.
    async fn get(&self, uri: &str) -> Result<String, StoreError>;

    /// Release the server-side session.
    async fn close(&self) -> Result<(), StoreError>;
}

/// HTTP client for the store service.
pub struct HttpStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpStore {
    /// Open a store session against the configured endpoint and data
    /// directory. A failure here is a setup failure and aborts the run.
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let store = Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        };

        // Store-side timeouts apply from here on; the client does not
        // override them.
        store
            .post(
                "api/open",
                json!({ "path": config.data_dir.display().to_string() }),
            )
            .await?;

        debug!(endpoint = %store.base_url, "store session opened");
        Ok(store)
    }

    async fn post(&self, route: &str, body: Value) -> Result<Value, StoreError> {
        let url = format!("{}/{}", self.base_url, route);
        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                code: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl DocumentStore for HttpStore {
    async fn add(&self, path: &str, target: Option<&str>) -> Result<Value, StoreError> {
        let mut body = json!({ "path": path });
        if let Some(target) = target {
            body["target"] = json!(target);
        }
        self.post("api/add", body).await
    }

    async fn wait_processed(&self) -> Result<(), StoreError> {
        self.post("api/wait_processed", json!({})).await?;
        Ok(())
    }

    async fn find(
        &self,
        query: &str,
        target_uri: Option<&str>,
        limit: usize,
    ) -> Result<Value, StoreError> {
        let mut body = json!({ "query": query, "limit": limit });
        if let Some(target_uri) = target_uri {
            body["target_uri"] = json!(target_uri);
        }
        self.post("api/find", body).await
    }

    async fn get(&self, uri: &str) -> Result<String, StoreError> {
        let response = self.post("api/get", json!({ "uri": uri })).await?;
        response
            .get("content")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| StoreError::Decode("get response missing 'content'".to_string()))
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.post("api/close", json!({})).await?;
        Ok(())
    }
}
