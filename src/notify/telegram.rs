use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use super::Notifier;
use crate::config::Secret;
use crate::error::NotifyError;

/// Telegram Bot API `sendMessage` to one chat.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    api_url: String,
    bot_token: Secret,
    chat_id: Secret,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

impl TelegramNotifier {
    pub fn new(
        client: Client,
        api_url: impl Into<String>,
        bot_token: Secret,
        chat_id: Secret,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            bot_token,
            chat_id,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.bot_token.expose());
        let payload = SendMessage {
            chat_id: self.chat_id.expose(),
            text,
            parse_mode: "MarkdownV2",
            disable_web_page_preview: true,
        };

        let rsp = self.client.post(url).json(&payload).send().await?;
        let status = rsp.status();
        if status != StatusCode::OK {
            let body = rsp.text().await.unwrap_or_default();
            return Err(NotifyError::Status {
                status,
                body: body.chars().take(200).collect(),
            });
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}
