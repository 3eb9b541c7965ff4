//! Scoped, ranked semantic retrieval.
//!
//! Issues a `find` against the store and normalizes the raw response into
//! a [`SearchResponse`]. The store ranks and scores; results are taken in
//! the order they arrive. A store failure is surfaced to the caller — in
//! the interactive loop it is caught at the per-question boundary.

use serde_json::Value;
use tracing::debug;

use crate::models::{SearchResponse, SearchResult};
use crate::store::{DocumentStore, StoreError};

/// Run a ranked semantic query, optionally scoped to a namespace subtree.
pub async fn find(
    store: &dyn DocumentStore,
    question: &str,
    target_uri: Option<&str>,
    limit: usize,
) -> Result<SearchResponse, StoreError> {
    let raw = store.find(question, target_uri, limit).await?;
    let response = normalize_response(&raw);
    debug!(
        hits = response.len(),
        scoped = target_uri.is_some(),
        "search completed"
    );
    Ok(response)
}

/// Normalize the store's find response.
///
/// Accepts both a `{"resources": [...]}` wrapper and a bare array. Entries
/// without a URI are dropped; empty content fields become `None` so the
/// assembler's priority probe sees real absence.
pub fn normalize_response(raw: &Value) -> SearchResponse {
    let entries = raw
        .get("resources")
        .and_then(Value::as_array)
        .or_else(|| raw.as_array());

    let resources = entries
        .map(|entries| entries.iter().filter_map(normalize_result).collect())
        .unwrap_or_default();

    SearchResponse { resources }
}

fn normalize_result(entry: &Value) -> Option<SearchResult> {
    let uri = entry.get("uri").and_then(Value::as_str)?.to_string();
    let score = entry.get("score").and_then(Value::as_f64).unwrap_or(0.0);

    Some(SearchResult {
        uri,
        score,
        overview: text_field(entry, "overview"),
        abstract_: text_field(entry, "abstract"),
        content: text_field(entry, "content"),
    })
}

fn text_field(entry: &Value, key: &str) -> Option<String> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
