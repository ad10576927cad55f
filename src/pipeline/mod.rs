// src/pipeline/mod.rs
//! Fixed flow: fetch → cache check → classify → {persist, notify}.
//!
//! The two terminal branches only read `classified_items`, so they are joined
//! concurrently. No step is retried and no step can stop the run.

pub mod state;

use std::sync::Arc;

use metrics::gauge;
use tracing::info;

pub use state::{PipelineState, Stage, StateUpdate};

use crate::analyze::{self, ai_adapter::SentimentModel};
use crate::cache;
use crate::ingest::{self, types::NewsSource};
use crate::metrics::{ensure_described, LAST_RUN_TS};
use crate::notify::{self, Notifier};
use crate::store::{self, NewsStore};

pub struct Pipeline {
    source: Arc<dyn NewsSource>,
    store: Arc<dyn NewsStore>,
    model: Arc<dyn SentimentModel>,
    notifier: Arc<dyn Notifier>,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn NewsSource>,
        store: Arc<dyn NewsStore>,
        model: Arc<dyn SentimentModel>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            source,
            store,
            model,
            notifier,
        }
    }

    /// Run every step once and return the final state.
    pub async fn run(&self) -> PipelineState {
        ensure_described();
        let mut state = PipelineState::new();

        let up = ingest::fetch_news(self.source.as_ref()).await;
        state.advance(Stage::Fetched, up);
        info!(stage = %Stage::Fetched, raw = state.raw_items.len(), "stage complete");

        let up = cache::check_cache(self.store.as_ref(), &state).await;
        state.advance(Stage::CacheChecked, up);
        info!(
            stage = %Stage::CacheChecked,
            cache_hits = state.cache_hits,
            unseen = state.unseen_items.len(),
            "stage complete"
        );

        let up = analyze::analyze_sentiment(self.model.as_ref(), &state).await;
        state.advance(Stage::Classified, up);
        info!(
            stage = %Stage::Classified,
            classified = state.classified_items.len(),
            "stage complete"
        );

        let (persisted, notified) = tokio::join!(
            store::write_news(self.store.as_ref(), &state),
            notify::notify(self.notifier.as_ref(), &state),
        );
        state.advance(Stage::Persisted, persisted);
        state.advance(Stage::Notified, notified);
        state.advance(Stage::End, StateUpdate::empty());

        gauge!(LAST_RUN_TS).set(chrono::Utc::now().timestamp() as f64);
        info!(
            raw = state.raw_items.len(),
            cache_hits = state.cache_hits,
            unseen = state.unseen_items.len(),
            classified = state.classified_items.len(),
            persisted = state.persisted,
            notified = state.notified,
            "pipeline run finished"
        );
        state
    }
}
