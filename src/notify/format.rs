// src/notify/format.rs
use crate::types::ClassifiedNewsItem;

pub const MAX_BODY_CHARS: usize = 300;
const ELLIPSIS: &str = "...";

/// Cap `text` at [`MAX_BODY_CHARS`] characters; longer text keeps its first 297
/// characters followed by `...`.
pub fn truncate_body(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= MAX_BODY_CHARS {
        return text.to_string();
    }
    let keep = MAX_BODY_CHARS - ELLIPSIS.len();
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Characters Telegram MarkdownV2 reserves anywhere in plain or entity text.
const RESERVED: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    '\\',
];

fn escape_with(s: &str, reserved: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if reserved.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Escape text for MarkdownV2, including text placed inside bold or link labels.
pub fn escape_markdown(s: &str) -> String {
    escape_with(s, RESERVED)
}

/// Escape the target of an inline link: only `)` and `\` are reserved there.
pub fn escape_link_target(s: &str) -> String {
    escape_with(s, &[')', '\\'])
}

/// `Some(url)` only for well-formed http(s) URLs.
pub fn link_target(raw: &str) -> Option<url::Url> {
    let parsed = url::Url::parse(raw.trim()).ok()?;
    matches!(parsed.scheme(), "http" | "https").then_some(parsed)
}

pub fn render_message(item: &ClassifiedNewsItem) -> String {
    let source = if item.source_name.trim().is_empty() {
        "Unknown".to_string()
    } else {
        escape_markdown(item.source_name.trim())
    };
    let attribution = match link_target(&item.url) {
        Some(url) => format!("📰 Source: [{source}]({})", escape_link_target(url.as_str())),
        None => format!("📰 Source: {source}"),
    };
    let relevant = if item.is_market_relevant { "Yes" } else { "No" };

    format!(
        "*{title}*\n\n{body}\n\n{sg} Sentiment: {sentiment}\n{ig} Importance: {importance}\n📊 Market relevant: {relevant}\n{attribution}",
        title = escape_markdown(item.title.trim()),
        body = escape_markdown(&truncate_body(&item.text)),
        sg = item.sentiment.glyph(),
        sentiment = item.sentiment,
        ig = item.importance.glyph(),
        importance = item.importance,
    )
}
