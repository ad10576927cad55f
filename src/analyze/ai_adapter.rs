//! AI adapter: the `SentimentModel` seam plus the OpenAI Chat Completions provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analyze::prompt::{response_schema, user_message, SYSTEM_PROMPT};
use crate::config::Secret;
use crate::error::ClassifyError;
use crate::types::Classification;

/// Anything that can label one article.
#[async_trait]
pub trait SentimentModel: Send + Sync {
    async fn classify(&self, title: &str, text: &str) -> Result<Classification, ClassifyError>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

/// OpenAI-compatible provider using strict structured output.
pub struct OpenAiClassifier {
    http: reqwest::Client,
    api_key: Secret,
    model: String,
    base_url: String,
}

impl OpenAiClassifier {
    /// `base_url` is the API root, e.g. `https://api.openai.com/v1`.
    pub fn new(
        http: reqwest::Client,
        api_key: Secret,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct JsonSchemaSpec {
    name: &'static str,
    strict: bool,
    schema: serde_json::Value,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaSpec,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

/// Pull the labels out of a Chat Completions response body.
pub fn parse_completion(body: &str) -> Result<Classification, ClassifyError> {
    let resp: Resp =
        serde_json::from_str(body).map_err(|e| ClassifyError::Malformed(e.to_string()))?;
    let msg = resp
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| ClassifyError::Malformed("no choices".into()))?;

    if let Some(r) = msg.refusal.filter(|r| !r.is_empty()) {
        return Err(ClassifyError::Refused(r));
    }
    let content = msg
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ClassifyError::Malformed("empty content".into()))?;
    serde_json::from_str(&content).map_err(|e| ClassifyError::Malformed(e.to_string()))
}

#[async_trait]
impl SentimentModel for OpenAiClassifier {
    async fn classify(&self, title: &str, text: &str) -> Result<Classification, ClassifyError> {
        let user = user_message(title, text);
        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Msg {
                    role: "user",
                    content: &user,
                },
            ],
            temperature: 0.2,
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaSpec {
                    name: "news_classification",
                    strict: true,
                    schema: response_schema(),
                },
            },
        };

        let resp = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose())
            .json(&req)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClassifyError::Status(status));
        }
        let body = resp.text().await?;
        parse_completion(&body)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
