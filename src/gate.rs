//! Barrier on the store's background embedding and indexing work.

use tracing::{info, warn};

use crate::store::DocumentStore;

/// Wait until the store reports that background processing has finished.
///
/// May block indefinitely; the store controls its own timeout behavior.
/// A failure here is non-fatal: processing may still complete in the
/// background, and later retrieval against partially indexed content is an
/// accepted risk rather than an error.
pub async fn wait_until_processed(store: &dyn DocumentStore) {
    match store.wait_processed().await {
        Ok(()) => {
            info!("background processing complete");
            println!("background processing complete");
        }
        Err(e) => {
            warn!(error = %e, "wait for processing failed; it may still be running");
            println!("warning: processing may still be running in the background: {}", e);
        }
    }
}
