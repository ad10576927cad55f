// src/store/memory.rs
use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{validate_batch, NewsDocument, NewsStore};
use crate::error::StoreError;

/// In-process document store with primary-key semantics on `_id`.
/// A batch containing a duplicate id is rejected whole, like a unique index would.
#[derive(Debug, Default)]
pub struct MemoryNewsStore {
    docs: Mutex<Vec<NewsDocument>>,
    unavailable: Mutex<bool>,
    insert_calls: Mutex<usize>,
}

impl MemoryNewsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(docs: Vec<NewsDocument>) -> Self {
        Self {
            docs: Mutex::new(docs),
            ..Self::default()
        }
    }

    /// Make every call fail as if the database were unreachable.
    pub fn set_unavailable(&self, down: bool) {
        *self.unavailable.lock().expect("store mutex poisoned") = down;
    }

    pub fn documents(&self) -> Vec<NewsDocument> {
        self.docs.lock().expect("store mutex poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.docs.lock().expect("store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn insert_calls(&self) -> usize {
        *self.insert_calls.lock().expect("store mutex poisoned")
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if *self.unavailable.lock().expect("store mutex poisoned") {
            return Err(StoreError::Unavailable("memory store switched off".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl NewsStore for MemoryNewsStore {
    async fn recent_ids(&self, limit: usize) -> Result<Vec<String>, StoreError> {
        self.check_available()?;
        let mut docs = self.documents();
        docs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(docs.into_iter().take(limit).map(|d| d.id).collect())
    }

    async fn insert_many(&self, docs: Vec<NewsDocument>) -> Result<Vec<String>, StoreError> {
        *self.insert_calls.lock().expect("store mutex poisoned") += 1;
        validate_batch(&docs)?;
        self.check_available()?;

        let mut stored = self.docs.lock().expect("store mutex poisoned");
        let mut seen: HashSet<&str> = stored.iter().map(|d| d.id.as_str()).collect();
        for d in &docs {
            if !seen.insert(d.id.as_str()) {
                return Err(StoreError::Conflict(format!("_id {}", d.id)));
            }
        }
        let ids: Vec<String> = docs.iter().map(|d| d.id.clone()).collect();
        stored.extend(docs);
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Importance, Sentiment};
    use chrono::DateTime;

    fn doc(id: &str, ts: &str) -> NewsDocument {
        NewsDocument {
            id: id.to_string(),
            title: id.to_string(),
            text: String::new(),
            source_name: "Test".into(),
            news_url: String::new(),
            image_url: String::new(),
            sentiment: Sentiment::Neutral,
            importance: Importance::Low,
            is_market_relevant: false,
            timestamp: DateTime::parse_from_rfc3339(ts).unwrap(),
        }
    }

    #[tokio::test]
    async fn recent_ids_are_newest_first_and_limited() {
        let store = MemoryNewsStore::with_documents(vec![
            doc("old", "2025-06-01T00:00:00+00:00"),
            doc("new", "2025-06-03T00:00:00+00:00"),
            doc("mid", "2025-06-02T00:00:00+00:00"),
        ]);
        let ids = store.recent_ids(2).await.unwrap();
        assert_eq!(ids, vec!["new".to_string(), "mid".to_string()]);
    }

    #[tokio::test]
    async fn duplicate_key_rejects_whole_batch() {
        let store = MemoryNewsStore::with_documents(vec![doc("a", "2025-06-01T00:00:00+00:00")]);
        let err = store
            .insert_many(vec![
                doc("b", "2025-06-02T00:00:00+00:00"),
                doc("a", "2025-06-02T00:00:00+00:00"),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(ref m) if m.contains("_id a")));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn unavailable_store_fails_reads() {
        let store = MemoryNewsStore::new();
        store.set_unavailable(true);
        assert!(store.recent_ids(20).await.is_err());
    }
}
