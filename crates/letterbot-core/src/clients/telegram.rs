//! Telegram Bot API client: long-polling updates, chat messages and PDF
//! document delivery

use crate::config::TelegramConfig;
use crate::error::{LetterBotError, Result};
use reqwest::{multipart, Client as HttpClient};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Incoming update from getUpdates
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    pub chat: TelegramChat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    ok: bool,
    #[serde(default)]
    result: Vec<TelegramUpdate>,
}

pub struct TelegramClient {
    bot_token: String,
    http_client: HttpClient,
}

impl TelegramClient {
    pub fn new(config: TelegramConfig) -> Self {
        // Applies to ordinary calls only; getUpdates sets a per-request
        // timeout sized to its poll window
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            bot_token: config.bot_token,
            http_client,
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{}", self.bot_token, method)
    }

    /// Send a text message with Markdown formatting
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let payload = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown"
        });

        let response = self
            .http_client
            .post(self.api_url("sendMessage"))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LetterBotError::ServiceUnavailable(format!(
                "Telegram API error: {}",
                error_text
            )));
        }

        Ok(())
    }

    /// Show a chat action (e.g. "typing") while the letter is generated
    pub async fn send_chat_action(&self, chat_id: i64, action: &str) -> Result<()> {
        let payload = json!({
            "chat_id": chat_id,
            "action": action
        });

        let response = self
            .http_client
            .post(self.api_url("sendChatAction"))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LetterBotError::ServiceUnavailable(format!(
                "Telegram API error: {}",
                error_text
            )));
        }

        Ok(())
    }

    /// Send a PDF document with a caption
    pub async fn send_document(
        &self,
        chat_id: i64,
        filename: &str,
        data: Vec<u8>,
        caption: &str,
    ) -> Result<()> {
        let part = multipart::Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str("application/pdf")?;

        let form = multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("document", part);

        let response = self
            .http_client
            .post(self.api_url("sendDocument"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LetterBotError::ServiceUnavailable(format!(
                "Telegram API error: {}",
                error_text
            )));
        }

        log::info!("Telegram document '{}' sent to chat {}", filename, chat_id);
        Ok(())
    }

    /// Long-poll for new updates starting at `offset`.
    ///
    /// The request timeout is the poll window plus a transport margin, so
    /// any configured window works without tripping the client timeout.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<TelegramUpdate>> {
        let payload = json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message"]
        });

        let response = self
            .http_client
            .post(self.api_url("getUpdates"))
            .timeout(poll_request_timeout(timeout_secs))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LetterBotError::ServiceUnavailable(format!(
                "Telegram API error: {}",
                error_text
            )));
        }

        let updates: UpdatesResponse = response.json().await?;
        if !updates.ok {
            return Err(LetterBotError::ServiceUnavailable(
                "Telegram getUpdates returned ok=false".to_string(),
            ));
        }

        Ok(updates.result)
    }
}

/// Transport deadline for one getUpdates call: the server holds the
/// connection for up to the poll window before answering
fn poll_request_timeout(window_secs: u64) -> Duration {
    Duration::from_secs(window_secs.saturating_add(10))
}
