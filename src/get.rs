//! Raw resource retrieval by URI.
//!
//! Fetches a resource's full text straight from the store, bypassing
//! retrieval ranking and context assembly.

use anyhow::Result;
use tracing::warn;

use crate::config::Config;
use crate::store::{DocumentStore, HttpStore};

/// CLI entry point for `grounded get`.
pub async fn run_get(config: &Config, uri: &str) -> Result<()> {
    let store = HttpStore::open(&config.store).await?;

    match store.get(uri).await {
        Ok(content) => {
            println!("--- {} ---", uri);
            println!("{}", content);
        }
        Err(e) => {
            warn!(error = %e, %uri, "get failed");
            println!("could not fetch {}: {}", uri, e);
        }
    }

    if let Err(e) = store.close().await {
        warn!(error = %e, "store close failed");
    }

    Ok(())
}
