// src/ingest/providers/cryptonews.rs
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use metrics::counter;
use serde::Deserialize;

use crate::config::Secret;
use crate::error::{FetchError, ItemParseError};
use crate::identity::news_id;
use crate::ingest::types::NewsSource;
use crate::metrics::{FETCHED, PARSE_ERRORS};
use crate::types::RawNewsItem;

/// Date format used by the API, e.g. `Sun, 15 Jun 2025 09:30:00 -0400`.
pub const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

#[derive(Debug, Deserialize)]
struct Payload {
    data: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
    text: Option<String>,
    source_name: Option<String>,
    news_url: Option<String>,
    image_url: Option<String>,
    date: Option<String>,
}

pub fn parse_date(s: &str) -> Result<DateTime<FixedOffset>, ItemParseError> {
    DateTime::parse_from_str(s.trim(), DATE_FORMAT).map_err(|source| ItemParseError::Timestamp {
        value: s.to_string(),
        source,
    })
}

fn parse_entry(entry: serde_json::Value) -> Result<RawNewsItem, ItemParseError> {
    let a: Article = serde_json::from_value(entry)?;
    let title = a
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or(ItemParseError::MissingField("title"))?;
    let date = a.date.ok_or(ItemParseError::MissingField("date"))?;
    let published_at = parse_date(&date)?;

    Ok(RawNewsItem {
        id: news_id(&title, &published_at),
        title,
        text: a.text.unwrap_or_default(),
        source_name: a.source_name.unwrap_or_default(),
        url: a.news_url.unwrap_or_default(),
        image_url: a.image_url.unwrap_or_default(),
        published_at,
    })
}

/// Parse a full response body. A body without a `data` array fails the whole batch;
/// individual bad entries are logged and skipped.
pub fn parse_payload(body: &str) -> Result<Vec<RawNewsItem>, FetchError> {
    let payload: Payload =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    let mut out = Vec::with_capacity(payload.data.len());
    for (idx, entry) in payload.data.into_iter().enumerate() {
        match parse_entry(entry) {
            Ok(item) => out.push(item),
            Err(e) => {
                tracing::error!(error = %e, index = idx, "failed to parse news item");
                counter!(PARSE_ERRORS).increment(1);
            }
        }
    }
    counter!(FETCHED).increment(out.len() as u64);
    Ok(out)
}

pub struct CryptoNewsProvider {
    url: String,
    api_key: Secret,
    client: reqwest::Client,
}

impl CryptoNewsProvider {
    /// `url` is the configured endpoint (it may already carry query parameters);
    /// the key is appended as `token`.
    pub fn from_url(url: impl Into<String>, api_key: Secret, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            api_key,
            client,
        }
    }
}

#[async_trait]
impl NewsSource for CryptoNewsProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawNewsItem>, FetchError> {
        let resp = self
            .client
            .get(self.url.as_str())
            .query(&[("token", self.api_key.expose())])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = resp.text().await?;
        tracing::info!(provider = self.name(), bytes = body.len(), "fetched latest news");
        parse_payload(&body)
    }

    fn name(&self) -> &'static str {
        "cryptonews"
    }
}
