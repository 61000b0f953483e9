use super::display_message;
use crate::types::{DeliverySink, FeedEntry, RelayError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Posts plain-text messages to one channel through the Telegram Bot API.
///
/// The bot token is part of every request URL, so transport errors are
/// stripped of their URL before they leave this type.
pub struct TelegramSink {
    client: Client,
    api_base: String,
    bot_token: String,
    chat_id: i64,
}

impl TelegramSink {
    pub fn new(client: Client, bot_token: impl Into<String>, chat_id: i64) -> Self {
        Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            bot_token: bot_token.into(),
            chat_id,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub async fn send_message(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);

        let resp = self
            .client
            .post(&url)
            .json(&json!({
                "chat_id": self.chat_id,
                "text": text,
            }))
            .send()
            .await
            .map_err(|e| RelayError::Http(e.without_url()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            return Err(RelayError::Telegram(format!("{}: {}", status, error_text)));
        }

        debug!("Sent message to chat {}", self.chat_id);
        Ok(())
    }
}

impl std::fmt::Debug for TelegramSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramSink")
            .field("api_base", &self.api_base)
            .field("bot_token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[async_trait]
impl DeliverySink for TelegramSink {
    async fn deliver(&self, entry: &FeedEntry) -> anyhow::Result<()> {
        Ok(self.send_message(&display_message(entry)).await?)
    }
}
