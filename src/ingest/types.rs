// src/ingest/types.rs
use crate::error::FetchError;
use crate::types::RawNewsItem;

/// A news API. Implementations skip entries that fail to parse and only return
/// `Err` when the request as a whole failed.
#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<RawNewsItem>, FetchError>;
    fn name(&self) -> &'static str;
}
