// src/analyze/mod.rs
pub mod ai_adapter;
pub mod prompt;

use metrics::counter;

use crate::analyze::ai_adapter::SentimentModel;
use crate::metrics::{CLASSIFIED, CLASSIFY_ERRORS};
use crate::pipeline::{PipelineState, StateUpdate};
use crate::types::{ClassifiedNewsItem, RawNewsItem};

/// Label each item in order. Failures drop the item; nothing is retried.
pub async fn classify_all(
    model: &dyn SentimentModel,
    items: &[RawNewsItem],
) -> Vec<ClassifiedNewsItem> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match model.classify(&item.title, &item.text).await {
            Ok(labels) => {
                tracing::info!(
                    id = %item.id,
                    sentiment = %labels.sentiment,
                    importance = %labels.importance,
                    "news item classified"
                );
                counter!(CLASSIFIED).increment(1);
                out.push(ClassifiedNewsItem::from_raw(item.clone(), labels));
            }
            Err(e) => {
                tracing::error!(
                    id = %item.id,
                    error = %e,
                    provider = model.provider_name(),
                    "failed to classify news item"
                );
                counter!(CLASSIFY_ERRORS).increment(1);
            }
        }
    }
    out
}

/// Classification step. With no unseen items the model is not contacted.
pub async fn analyze_sentiment(model: &dyn SentimentModel, state: &PipelineState) -> StateUpdate {
    if state.unseen_items.is_empty() {
        tracing::info!("no unseen news, skipping classification");
        return StateUpdate::empty();
    }
    tracing::info!(count = state.unseen_items.len(), "classifying news items");
    StateUpdate::classified(classify_all(model, &state.unseen_items).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClassifyError;
    use crate::types::{Classification, Importance, Sentiment};
    use async_trait::async_trait;
    use chrono::DateTime;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails on titles containing "boom", counts every call.
    struct Flaky {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SentimentModel for Flaky {
        async fn classify(
            &self,
            title: &str,
            _text: &str,
        ) -> Result<Classification, ClassifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if title.contains("boom") {
                return Err(ClassifyError::Malformed("not json".into()));
            }
            Ok(Classification {
                sentiment: Sentiment::Neutral,
                importance: Importance::Low,
                is_market_relevant: false,
            })
        }
        fn provider_name(&self) -> &'static str {
            "flaky"
        }
    }

    fn raw(id: &str, title: &str) -> RawNewsItem {
        RawNewsItem {
            id: id.into(),
            title: title.into(),
            text: "body".into(),
            source_name: "Test".into(),
            url: String::new(),
            image_url: String::new(),
            published_at: DateTime::parse_from_rfc3339("2025-06-16T14:05:07+00:00").unwrap(),
        }
    }

    #[tokio::test]
    async fn empty_input_makes_no_calls() {
        let m = Flaky {
            calls: AtomicUsize::new(0),
        };
        let up = analyze_sentiment(&m, &PipelineState::new()).await;
        assert!(up.is_empty());
        assert_eq!(m.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failing_item_is_dropped_rest_kept() {
        let m = Flaky {
            calls: AtomicUsize::new(0),
        };
        let items = vec![raw("1", "ok one"), raw("2", "boom"), raw("3", "ok three")];
        let out = classify_all(&m, &items).await;
        assert_eq!(m.calls.load(Ordering::SeqCst), 3);
        let ids: Vec<_> = out.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }
}
