// tests/common/mod.rs
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::DateTime;
use crypto_news_pipeline::error::{ClassifyError, FetchError, NotifyError};
use crypto_news_pipeline::identity::news_id;
use crypto_news_pipeline::store::NewsDocument;
use crypto_news_pipeline::types::{Classification, Importance, RawNewsItem, Sentiment};
use crypto_news_pipeline::{NewsSource, Notifier, SentimentModel};

pub fn raw_item(title: &str, ts: &str) -> RawNewsItem {
    let published_at = DateTime::parse_from_rfc3339(ts).expect("valid rfc3339");
    RawNewsItem {
        id: news_id(title, &published_at),
        title: title.to_string(),
        text: format!("{title} body"),
        source_name: "CoinDesk".into(),
        url: "https://www.coindesk.com/x".into(),
        image_url: String::new(),
        published_at,
    }
}

pub fn stored_doc(item: &RawNewsItem) -> NewsDocument {
    NewsDocument {
        id: item.id.clone(),
        title: item.title.clone(),
        text: item.text.clone(),
        source_name: item.source_name.clone(),
        news_url: item.url.clone(),
        image_url: item.image_url.clone(),
        sentiment: Sentiment::Neutral,
        importance: Importance::Low,
        is_market_relevant: false,
        timestamp: item.published_at,
    }
}

/// Returns a fixed batch, or a request failure.
pub struct StaticSource {
    pub items: Option<Vec<RawNewsItem>>,
}

#[async_trait]
impl NewsSource for StaticSource {
    async fn fetch_latest(&self) -> Result<Vec<RawNewsItem>, FetchError> {
        self.items
            .clone()
            .ok_or(FetchError::Status(reqwest::StatusCode::UNAUTHORIZED))
    }
    fn name(&self) -> &'static str {
        "static"
    }
}

/// Labels everything POSITIVE/HIGH and records the titles it saw.
#[derive(Default)]
pub struct CountingModel {
    pub calls: AtomicUsize,
    pub titles: Mutex<Vec<String>>,
}

impl CountingModel {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SentimentModel for CountingModel {
    async fn classify(&self, title: &str, _text: &str) -> Result<Classification, ClassifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.titles.lock().unwrap().push(title.to_string());
        Ok(Classification {
            sentiment: Sentiment::Positive,
            importance: Importance::High,
            is_market_relevant: true,
        })
    }
    fn provider_name(&self) -> &'static str {
        "counting"
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn attempts(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        self.messages.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(NotifyError::Status {
                status: reqwest::StatusCode::FORBIDDEN,
                body: "bot was kicked".into(),
            });
        }
        Ok(())
    }
    fn name(&self) -> &'static str {
        "recording"
    }
}
