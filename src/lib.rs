// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod analyze;
pub mod cache;
pub mod config;
pub mod error;
pub mod identity;
pub mod ingest;
pub mod logging;
pub mod metrics;
pub mod notify;
pub mod pipeline;
pub mod store;
pub mod types;

// ---- Re-exports for stable public API ----
pub use crate::analyze::ai_adapter::{OpenAiClassifier, SentimentModel};
pub use crate::ingest::providers::cryptonews::CryptoNewsProvider;
pub use crate::ingest::types::NewsSource;
pub use crate::notify::{Notifier, TelegramNotifier};
pub use crate::pipeline::{Pipeline, PipelineState, Stage, StateUpdate};
pub use crate::store::{MemoryNewsStore, NewsStore, PgNewsStore};
