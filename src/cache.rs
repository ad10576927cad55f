// src/cache.rs
//! Recency cache: drop items whose id is among the newest stored documents.
//!
//! The window is a fixed 20 ids. More than 20 new items between two runs, or an
//! unstable feed order, lets duplicates through; that limit is kept as is.

use std::collections::HashSet;

use metrics::counter;

use crate::metrics::{CACHE_HITS, STORE_ERRORS};
use crate::pipeline::{PipelineState, StateUpdate};
use crate::store::NewsStore;
use crate::types::RawNewsItem;

pub const CACHE_WINDOW: usize = 20;

/// Split `raw` into (hits, unseen) against `cached`, keeping source order.
/// Items without an id are logged and dropped without counting as hits.
pub fn partition_unseen(
    raw: &[RawNewsItem],
    cached: &HashSet<String>,
) -> (usize, Vec<RawNewsItem>) {
    let mut hits = 0usize;
    let mut unseen = Vec::with_capacity(raw.len());
    for item in raw {
        if item.id.trim().is_empty() {
            tracing::error!(title = %item.title, "news item has no id, dropping");
        } else if cached.contains(&item.id) {
            hits += 1;
        } else {
            unseen.push(item.clone());
        }
    }
    (hits, unseen)
}

/// Cache-check step. A failed lookup contributes nothing to the state.
pub async fn check_cache(store: &dyn NewsStore, state: &PipelineState) -> StateUpdate {
    if state.raw_items.is_empty() {
        tracing::error!("no raw news in state, skipping cache check");
        return StateUpdate::empty();
    }

    let cached: HashSet<String> = match store.recent_ids(CACHE_WINDOW).await {
        Ok(ids) => ids.into_iter().collect(),
        Err(e) => {
            tracing::error!(error = %e, "failed to check cache");
            counter!(STORE_ERRORS).increment(1);
            return StateUpdate::empty();
        }
    };
    tracing::info!(size = cached.len(), "cache loaded");

    let (hits, unseen) = partition_unseen(&state.raw_items, &cached);
    counter!(CACHE_HITS).increment(hits as u64);
    tracing::info!(cache_hits = hits, unseen = unseen.len(), "cache checked");
    StateUpdate::cache_checked(cached, hits, unseen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryNewsStore, NewsDocument};
    use crate::types::{Importance, Sentiment};
    use chrono::{DateTime, Duration};

    fn raw(id: &str) -> RawNewsItem {
        RawNewsItem {
            id: id.to_string(),
            title: format!("title {id}"),
            text: String::new(),
            source_name: "Test".into(),
            url: String::new(),
            image_url: String::new(),
            published_at: DateTime::parse_from_rfc3339("2025-06-16T14:05:07+00:00").unwrap(),
        }
    }

    fn doc(id: &str, minutes: i64) -> NewsDocument {
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
            timestamp: DateTime::parse_from_rfc3339("2025-06-01T00:00:00+00:00").unwrap()
                + Duration::minutes(minutes),
        }
    }

    #[test]
    fn hits_equal_intersection_and_order_is_kept() {
        let items = vec![raw("a"), raw("b"), raw("c"), raw("d")];
        let cached = HashSet::from(["b".to_string(), "d".to_string(), "z".to_string()]);
        let (hits, unseen) = partition_unseen(&items, &cached);
        assert_eq!(hits, 2);
        let ids: Vec<_> = unseen.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn missing_id_is_dropped_not_counted() {
        let items = vec![raw(""), raw("a")];
        let (hits, unseen) = partition_unseen(&items, &HashSet::new());
        assert_eq!(hits, 0);
        assert_eq!(unseen.len(), 1);
    }

    #[tokio::test]
    async fn only_the_newest_twenty_count() {
        // "oldest" is 21st by timestamp, so it falls outside the window.
        let mut docs: Vec<_> = (0..20).map(|i| doc(&format!("n{i}"), 100 + i)).collect();
        docs.push(doc("oldest", 0));
        let store = MemoryNewsStore::with_documents(docs);

        let mut st = PipelineState::new();
        st.raw_items = vec![raw("oldest"), raw("n5"), raw("fresh")];
        let up = check_cache(&store, &st).await;

        assert_eq!(up.cache_hits, Some(1));
        assert_eq!(up.cached_ids.as_ref().map(|c| c.len()), Some(CACHE_WINDOW));
        let unseen: Vec<_> = up.unseen_items.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(unseen, vec!["oldest".to_string(), "fresh".to_string()]);
    }

    #[tokio::test]
    async fn lookup_failure_is_an_empty_update() {
        let store = MemoryNewsStore::new();
        store.set_unavailable(true);
        let mut st = PipelineState::new();
        st.raw_items = vec![raw("a")];
        assert!(check_cache(&store, &st).await.is_empty());
    }

    #[tokio::test]
    async fn empty_input_skips_storage() {
        let store = MemoryNewsStore::new();
        store.set_unavailable(true);
        assert!(check_cache(&store, &PipelineState::new()).await.is_empty());
    }
}
