//! Error types for each pipeline step.
//!
//! Upstream failures (network, storage, model, chat API) report `is_transient() == true`:
//! they could succeed on a later run but are never retried within one.
//! Validation errors are caller mistakes and are surfaced as such.
//!
//! `reqwest` errors are stored with their URL stripped; the news API key and the bot
//! token are both carried in request URLs.

use reqwest::StatusCode;

/// Request-level failure of the news source. The whole batch is abandoned.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("news request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("news api returned {0}")]
    Status(StatusCode),

    #[error("news payload could not be decoded: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Decode(e.without_url().to_string())
        } else {
            FetchError::Http(e.without_url())
        }
    }
}

impl FetchError {
    pub fn is_transient(&self) -> bool {
        !matches!(self, FetchError::Decode(_))
    }
}

/// A single source entry that could not be normalized. Only that entry is skipped.
#[derive(Debug, thiserror::Error)]
pub enum ItemParseError {
    #[error("entry is not a news object: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid date {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Classification failure for one item.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("model request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("model api returned {0}")]
    Status(StatusCode),

    #[error("model refused: {0}")]
    Refused(String),

    #[error("malformed model output: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ClassifyError {
    fn from(e: reqwest::Error) -> Self {
        ClassifyError::Http(e.without_url())
    }
}

impl ClassifyError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ClassifyError::Http(_) | ClassifyError::Status(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The caller handed over a batch the store must not accept.
    #[error("invalid batch: {0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("document could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A document's `_id` is already stored; the whole batch was rejected.
    #[error("duplicate key: {0}")]
    Conflict(String),
}

impl StoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        StoreError::Validation(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Database(_) | StoreError::Unavailable(_))
    }
}

/// Failure to deliver one chat message.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("chat request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("chat api returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        NotifyError::Http(e.without_url())
    }
}
