// src/store/mod.rs
//! Document storage for classified news.
//!
//! Documents are keyed by `_id`; the in-memory `id` field is renamed on the way in.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use metrics::counter;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::metrics::{PERSISTED, STORE_ERRORS};
use crate::pipeline::{PipelineState, StateUpdate};
use crate::types::{ClassifiedNewsItem, Importance, Sentiment};

pub use memory::MemoryNewsStore;
pub use postgres::PgNewsStore;

/// Name of the document collection.
pub const COLLECTION: &str = "news";

/// Stored shape of a classified item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub text: String,
    pub source_name: String,
    pub news_url: String,
    pub image_url: String,
    pub sentiment: Sentiment,
    pub importance: Importance,
    pub is_market_relevant: bool,
    pub timestamp: DateTime<FixedOffset>,
}

impl From<&ClassifiedNewsItem> for NewsDocument {
    fn from(it: &ClassifiedNewsItem) -> Self {
        Self {
            id: it.id.clone(),
            title: it.title.clone(),
            text: it.text.clone(),
            source_name: it.source_name.clone(),
            news_url: it.url.clone(),
            image_url: it.image_url.clone(),
            sentiment: it.sentiment,
            importance: it.importance,
            is_market_relevant: it.is_market_relevant,
            timestamp: it.published_at,
        }
    }
}

#[async_trait]
pub trait NewsStore: Send + Sync {
    /// Ids of the `limit` newest documents, by `timestamp` descending.
    async fn recent_ids(&self, limit: usize) -> Result<Vec<String>, StoreError>;

    /// Insert all documents in one operation; either all are stored or none.
    /// Returns the inserted ids.
    async fn insert_many(&self, docs: Vec<NewsDocument>) -> Result<Vec<String>, StoreError>;
}

/// Reject batches the store must never see.
pub fn validate_batch(docs: &[NewsDocument]) -> Result<(), StoreError> {
    if docs.is_empty() {
        return Err(StoreError::validation("news list must not be empty"));
    }
    if let Some(pos) = docs.iter().position(|d| d.id.trim().is_empty()) {
        return Err(StoreError::validation(format!(
            "document at index {pos} has no _id"
        )));
    }
    Ok(())
}

/// Persist every classified item in a single bulk insert.
pub async fn add_bulk_news(
    store: &dyn NewsStore,
    items: &[ClassifiedNewsItem],
) -> Result<Vec<String>, StoreError> {
    let docs: Vec<NewsDocument> = items.iter().map(NewsDocument::from).collect();
    validate_batch(&docs)?;
    store.insert_many(docs).await
}

/// Write step. No classified items means nothing to do; a failed insert is logged
/// and reported as `persisted = false`.
pub async fn write_news(store: &dyn NewsStore, state: &PipelineState) -> StateUpdate {
    if state.classified_items.is_empty() {
        tracing::info!("no new items for database write");
        return StateUpdate::empty();
    }

    match add_bulk_news(store, &state.classified_items).await {
        Ok(ids) => {
            tracing::info!(count = ids.len(), collection = COLLECTION, "news written to database");
            counter!(PERSISTED).increment(ids.len() as u64);
            StateUpdate::persisted(!ids.is_empty())
        }
        Err(e) => {
            tracing::error!(error = %e, transient = e.is_transient(), "failed to insert news");
            counter!(STORE_ERRORS).increment(1);
            StateUpdate::persisted(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawNewsItem;

    fn item(id: &str) -> ClassifiedNewsItem {
        ClassifiedNewsItem::from_raw(
            RawNewsItem {
                id: id.to_string(),
                title: "SEC dismisses case".into(),
                text: "Judge rules".into(),
                source_name: "Reuters".into(),
                url: "https://reuters.com/a".into(),
                image_url: String::new(),
                published_at: DateTime::parse_from_rfc3339("2025-06-16T14:05:07+00:00")
                    .unwrap(),
            },
            crate::types::Classification {
                sentiment: Sentiment::Positive,
                importance: Importance::High,
                is_market_relevant: true,
            },
        )
    }

    #[test]
    fn id_is_renamed_to_primary_key() {
        let doc = NewsDocument::from(&item("abc"));
        let v = serde_json::to_value(&doc).unwrap();
        assert_eq!(v["_id"], "abc");
        assert!(v.get("id").is_none());
        assert_eq!(v["news_url"], "https://reuters.com/a");
        assert_eq!(v["sentiment"], "POSITIVE");
        assert!(v["timestamp"]
            .as_str()
            .unwrap()
            .starts_with("2025-06-16T14:05:07"));
        let back: NewsDocument = serde_json::from_value(v).unwrap();
        assert_eq!(back, doc);
    }

    #[tokio::test]
    async fn empty_batch_is_a_validation_error() {
        let store = MemoryNewsStore::new();
        let err = add_bulk_news(&store, &[]).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn document_without_id_is_rejected() {
        let store = MemoryNewsStore::new();
        let err = add_bulk_news(&store, &[item("ok"), item(" ")])
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn write_step_skips_empty_state() {
        let store = MemoryNewsStore::new();
        let up = write_news(&store, &PipelineState::new()).await;
        assert!(up.is_empty());
        assert_eq!(store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn write_step_reports_failure() {
        let store = MemoryNewsStore::new();
        store.set_unavailable(true);
        let mut st = PipelineState::new();
        st.classified_items = vec![item("a")];
        let up = write_news(&store, &st).await;
        assert_eq!(up.persisted, Some(false));
    }
}
