// src/ingest/mod.rs
pub mod providers;
pub mod types;

use metrics::counter;

use crate::ingest::types::NewsSource;
use crate::metrics::FETCH_ERRORS;
use crate::pipeline::StateUpdate;

/// Fetch step. A failed request yields an empty batch rather than an error, so the
/// rest of the run sees no raw items.
pub async fn fetch_news(source: &dyn NewsSource) -> StateUpdate {
    tracing::info!(provider = source.name(), "fetching latest cryptocurrency news");
    match source.fetch_latest().await {
        Ok(items) => {
            tracing::info!(provider = source.name(), count = items.len(), "news fetched");
            StateUpdate::raw_items(items)
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                transient = e.is_transient(),
                provider = source.name(),
                "failed to fetch latest news"
            );
            counter!(FETCH_ERRORS).increment(1);
            StateUpdate::raw_items(Vec::new())
        }
    }
}
