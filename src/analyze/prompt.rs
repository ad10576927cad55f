// src/analyze/prompt.rs
use serde_json::{json, Value};

pub const SYSTEM_PROMPT: &str = r#"You are a senior cryptocurrency market analyst who rates news for real-time trading desks.

## Tasks
1. Sentiment: how the news is likely to move the price of the assets it concerns (POSITIVE, NEGATIVE, NEUTRAL).
2. Importance: expected market significance in terms of volume and volatility (LOW, MEDIUM, HIGH).
3. Market relevance: true for news with a demonstrable effect on trading decisions (regulation, institutional flows, technical milestones, major partnerships); false for unsupported speculation, minor influencer opinions, repeated announcements, or unsourced content.

## Examples
Input: {"title": "SEC Dismisses Coinbase Enforcement Action", "text": "Federal judge rules in favor of Coinbase in landmark regulatory case..."}
Output: {"sentiment": "POSITIVE", "importance": "HIGH", "is_market_relevant": true}

Input: {"title": "Shiba Inu Announces Gaming Platform Integration", "text": "Popular memecoin secures partnership with established gaming platform..."}
Output: {"sentiment": "NEUTRAL", "importance": "MEDIUM", "is_market_relevant": true}

Input: {"title": "Anonymous Trader Predicts Dogecoin Moon Mission", "text": "Unverified social media account claims insider knowledge..."}
Output: {"sentiment": "NEUTRAL", "importance": "LOW", "is_market_relevant": false}

Stay objective and weigh measurable market impact over narrative."#;

pub fn user_message(title: &str, text: &str) -> String {
    format!("Analyze the following news article: Title: {title} Text: {text}")
}

/// Strict JSON schema for the three labels.
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "sentiment": {
                "type": "string",
                "enum": ["POSITIVE", "NEGATIVE", "NEUTRAL"],
                "description": "Sentiment of the news item"
            },
            "importance": {
                "type": "string",
                "enum": ["LOW", "MEDIUM", "HIGH"],
                "description": "Importance of the news item"
            },
            "is_market_relevant": {
                "type": "boolean",
                "description": "Whether the news item is market relevant"
            }
        },
        "required": ["sentiment", "importance", "is_market_relevant"],
        "additionalProperties": false
    })
}
