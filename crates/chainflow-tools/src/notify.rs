//! Notification capability.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

use crate::error::ToolError;
use crate::http::{HttpClient, HttpRequest};

const TELEGRAM_API: &str = "https://api.telegram.org";

/// Capability for posting a text notification.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<(), ToolError>;
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram Bot API `sendMessage` notifier.
pub struct TelegramNotifier {
    http: Arc<dyn HttpClient>,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Create a notifier for the public Bot API.
    pub fn new(http: Arc<dyn HttpClient>, bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self::with_api_base(http, TELEGRAM_API, bot_token, chat_id)
    }

    /// Create a notifier against a custom API base URL.
    pub fn with_api_base(
        http: Arc<dyn HttpClient>,
        api_base: &str,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    fn send_message_url(&self, text: &str) -> Result<Url, ToolError> {
        Url::parse_with_params(
            &format!("{}/bot{}/sendMessage", self.api_base, self.bot_token),
            &[("chat_id", self.chat_id.as_str()), ("text", text)],
        )
        .map_err(|e| ToolError::Configuration(format!("Invalid Telegram URL: {}", e)))
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> Result<(), ToolError> {
        let url = self.send_message_url(text)?;
        let request = HttpRequest::get(url.as_str()).with_header("Accept", "application/json");

        let response = self.http.send(&request).await?;
        // Keep the bot token out of error messages.
        response.require_ok(&format!("{}/sendMessage", self.api_base))?;

        let body: TelegramResponse = response.json()?;
        if !body.ok {
            return Err(ToolError::Notification(
                body.description.unwrap_or_else(|| "Telegram returned ok=false".to_string()),
            ));
        }

        tracing::debug!(chat_id = %self.chat_id, "Telegram message sent");
        Ok(())
    }
}
