// src/types.rs
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Market direction the model assigns to a headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    #[serde(alias = "positive")]
    Positive,
    #[serde(alias = "negative")]
    Negative,
    #[serde(alias = "neutral")]
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
            Sentiment::Neutral => "NEUTRAL",
        }
    }

    /// Glyph shown next to the label in chat messages.
    pub fn glyph(&self) -> &'static str {
        match self {
            Sentiment::Positive => "🟢",
            Sentiment::Negative => "🔴",
            Sentiment::Neutral => "⚪",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Importance {
    #[serde(alias = "low")]
    Low,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "high")]
    High,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Low => "LOW",
            Importance::Medium => "MEDIUM",
            Importance::High => "HIGH",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Importance::Low => "💤",
            Importance::Medium => "⚡",
            Importance::High => "🔥",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A news item as normalized from the source API. `id` is derived from
/// title + timestamp (see [`crate::identity::news_id`]), never taken from the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNewsItem {
    pub id: String,
    pub title: String,
    pub text: String,
    pub source_name: String,
    pub url: String,
    pub image_url: String,
    pub published_at: DateTime<FixedOffset>,
}

/// Structured answer of the language model; exactly the three labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub sentiment: Sentiment,
    pub importance: Importance,
    pub is_market_relevant: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedNewsItem {
    pub id: String,
    pub title: String,
    pub text: String,
    pub source_name: String,
    pub url: String,
    pub image_url: String,
    pub published_at: DateTime<FixedOffset>,
    pub sentiment: Sentiment,
    pub importance: Importance,
    pub is_market_relevant: bool,
}

impl ClassifiedNewsItem {
    pub fn from_raw(item: RawNewsItem, labels: Classification) -> Self {
        Self {
            id: item.id,
            title: item.title,
            text: item.text,
            source_name: item.source_name,
            url: item.url,
            image_url: item.image_url,
            published_at: item.published_at,
            sentiment: labels.sentiment,
            importance: labels.importance,
            is_market_relevant: labels.is_market_relevant,
        }
    }
}
