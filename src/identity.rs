// src/identity.rs
//! Deterministic news identifiers.
//!
//! The id is a UUIDv5 (SHA-1, DNS namespace) over `"{trimmed title}-{RFC 3339 timestamp}"`,
//! so the same article fetched on different runs always maps to the same id.

use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

pub fn news_id(title: &str, published_at: &DateTime<FixedOffset>) -> String {
    let key = format!("{}-{}", title.trim(), published_at.to_rfc3339());
    let preview: String = key.chars().take(50).collect();
    tracing::trace!(key = %preview, "derived id key");
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, key.as_bytes()).to_string()
}
