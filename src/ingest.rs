//! Resource ingestion.
//!
//! Adds one file, or every file under a directory, to the store and
//! classifies each response into an [`IngestionOutcome`]. Each file is
//! independent: a failure is recorded and the batch continues — ingestion
//! never aborts early, and no retry is attempted.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::Value;
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::gate;
use crate::models::IngestionOutcome;
use crate::store::{DocumentStore, HttpStore};

/// Classify a raw `add` response into an outcome.
///
/// The store answers with a varying shape: an error status with messages,
/// a root identifier under one of several keys, or neither.
pub fn classify_add_response(response: &Value) -> IngestionOutcome {
    if response.get("status").and_then(Value::as_str) == Some("error") {
        let messages: Vec<String> = response
            .get("errors")
            .and_then(Value::as_array)
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let messages = if messages.is_empty() {
            vec!["unknown error".to_string()]
        } else {
            messages
        };

        return IngestionOutcome::ParseError { messages };
    }

    let root_uri = response
        .get("root_uri")
        .or_else(|| response.get("uri"))
        .or_else(|| response.get("id"))
        .and_then(Value::as_str);

    match root_uri {
        Some(uri) => IngestionOutcome::Success {
            root_uri: uri.to_string(),
        },
        None => IngestionOutcome::Ambiguous,
    }
}

/// Ingest a single file; always returns an outcome, never an error.
pub async fn ingest_file(
    store: &dyn DocumentStore,
    path: &Path,
    target: Option<&str>,
) -> IngestionOutcome {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    println!("adding: {}", name);

    let outcome = match store.add(&path.display().to_string(), target).await {
        Ok(response) => classify_add_response(&response),
        // Transport failures are per-file too; record, don't propagate.
        Err(e) => IngestionOutcome::ParseError {
            messages: vec![e.to_string()],
        },
    };

    match &outcome {
        IngestionOutcome::Success { root_uri } => {
            info!(path = %path.display(), %root_uri, "resource added");
            println!("added: {} -> {}", name, root_uri);
        }
        IngestionOutcome::ParseError { messages } => {
            let joined = messages.join("; ");
            error!(path = %path.display(), errors = %joined, "resource rejected");
            println!("parse failed: {} - {}", name, joined);
        }
        IngestionOutcome::Ambiguous => {
            warn!(path = %path.display(), "add response carried no root uri");
            println!("added without root uri: {}", name);
        }
    }

    outcome
}

/// Ingest every file under a directory, recursively.
///
/// Directories themselves are skipped silently. An entry that cannot be
/// enumerated is recorded like any other per-file failure and the walk
/// continues — the batch never aborts early. Returns only the root URIs
/// of successful files, in discovery order.
pub async fn ingest_directory(
    store: &dyn DocumentStore,
    dir: &Path,
    target: Option<&str>,
) -> Vec<String> {
    println!("scanning directory: {}", dir.display());

    let mut files = Vec::new();
    // Sorted walk keeps discovery order deterministic.
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                error!(error = %e, "could not enumerate entry");
                println!("could not enumerate entry: {}", e);
                continue;
            }
        };
        if entry.file_type().is_file() {
            files.push(entry.path().to_path_buf());
        }
    }

    println!("found {} files", files.len());

    let mut added = Vec::new();
    for file in &files {
        if let IngestionOutcome::Success { root_uri } = ingest_file(store, file, target).await {
            added.push(root_uri);
        }
    }

    added
}

/// CLI entry point for `grounded add`.
///
/// Accepts any mix of file and directory paths; non-existent paths are
/// reported and skipped. After the batch, waits for background processing
/// and releases the store session.
pub async fn run_add(config: &Config, paths: &[PathBuf], target: Option<String>) -> Result<()> {
    let store = HttpStore::open(&config.store).await?;
    let target = target.unwrap_or_else(|| config.retrieval.ingest_target.clone());
    info!(%target, "ingestion session started");

    let mut all_uris = Vec::new();

    for path in paths {
        if path.is_dir() {
            println!("\nprocessing directory: {}", path.display());
            let uris = ingest_directory(&store, path, Some(&target)).await;
            all_uris.extend(uris);
        } else if path.is_file() {
            println!("\nprocessing file: {}", path.display());
            if let IngestionOutcome::Success { root_uri } =
                ingest_file(&store, path, Some(&target)).await
            {
                all_uris.push(root_uri);
            }
        } else {
            warn!(path = %path.display(), "path does not exist");
            println!("path does not exist: {}", path.display());
        }
    }

    println!("\nadded {} resources", all_uris.len());
    if !all_uris.is_empty() {
        println!("\nresource URIs:");
        for uri in &all_uris {
            println!("  - {}", uri);
        }
    }

    println!("\nwaiting for background processing...");
    gate::wait_until_processed(&store).await;

    if let Err(e) = store.close().await {
        warn!(error = %e, "store close failed");
    }
    info!("ingestion session ended");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_status_joins_all_messages() {
        let response = json!({
            "status": "error",
            "errors": ["bad encoding", "unsupported format"]
        });
        assert_eq!(
            classify_add_response(&response),
            IngestionOutcome::ParseError {
                messages: vec!["bad encoding".to_string(), "unsupported format".to_string()]
            }
        );
    }

    #[test]
    fn error_status_without_messages_gets_placeholder() {
        let response = json!({ "status": "error" });
        assert_eq!(
            classify_add_response(&response),
            IngestionOutcome::ParseError {
                messages: vec!["unknown error".to_string()]
            }
        );
    }

    #[test]
    fn root_uri_key_fallback_order() {
        let response = json!({ "root_uri": "viking://resources/contract/a" });
        assert_eq!(
            classify_add_response(&response),
            IngestionOutcome::Success {
                root_uri: "viking://resources/contract/a".to_string()
            }
        );

        let response = json!({ "uri": "viking://resources/contract/b" });
        assert_eq!(
            classify_add_response(&response),
            IngestionOutcome::Success {
                root_uri: "viking://resources/contract/b".to_string()
            }
        );

        let response = json!({ "id": "viking://resources/contract/c" });
        assert_eq!(
            classify_add_response(&response),
            IngestionOutcome::Success {
                root_uri: "viking://resources/contract/c".to_string()
            }
        );
    }

    #[test]
    fn response_without_identifier_is_ambiguous() {
        let response = json!({ "accepted": true });
        assert_eq!(classify_add_response(&response), IngestionOutcome::Ambiguous);
    }

    #[test]
    fn error_status_wins_over_identifier() {
        let response = json!({
            "status": "error",
            "errors": ["truncated file"],
            "root_uri": "viking://resources/contract/x"
        });
        assert!(matches!(
            classify_add_response(&response),
            IngestionOutcome::ParseError { .. }
        ));
    }
}
