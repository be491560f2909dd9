//! Minimal Telegram Bot API client: long-polled updates and plain-text
//! message sending.

use std::time::Duration;

use serde::Deserialize;

use newslens_common::{error::Result, NewsLensError};

const TELEGRAM_API: &str = "https://api.telegram.org";
/// Long-poll window for getUpdates, in seconds.
const POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub first_name: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> Self {
        Self::with_base_url(TELEGRAM_API, token)
    }

    pub fn with_base_url(base_url: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::builder()
                // Longer than the long-poll window plus slack.
                .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 15))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: format!("{}/bot{token}", base_url.trim_end_matches('/')),
        }
    }

    /// Fetch pending updates after `offset`, blocking server-side for up to
    /// the poll window when none are queued.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let resp = self
            .http
            .get(format!("{}/getUpdates", self.base_url))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", POLL_TIMEOUT_SECS.to_string()),
            ])
            .send()
            .await
            .map_err(|e| NewsLensError::Downstream(e.to_string()))?;

        let body: ApiResponse<Vec<Update>> = resp
            .json()
            .await
            .map_err(|e| NewsLensError::Downstream(e.to_string()))?;

        if !body.ok {
            return Err(NewsLensError::Downstream(
                body.description
                    .unwrap_or_else(|| "Telegram API error".to_string()),
            ));
        }
        Ok(body.result.unwrap_or_default())
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let resp = self
            .http
            .post(format!("{}/sendMessage", self.base_url))
            .json(&serde_json::json!({"chat_id": chat_id, "text": text}))
            .send()
            .await
            .map_err(|e| NewsLensError::Downstream(e.to_string()))?;

        let body: ApiResponse<serde_json::Value> = resp
            .json()
            .await
            .map_err(|e| NewsLensError::Downstream(e.to_string()))?;

        if !body.ok {
            return Err(NewsLensError::Downstream(
                body.description
                    .unwrap_or_else(|| "Telegram API error".to_string()),
            ));
        }
        Ok(())
    }
}
