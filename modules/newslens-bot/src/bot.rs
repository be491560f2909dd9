//! Message handling: commands, URL submissions, and replies.

use std::time::Duration;

use tracing::{info, warn};

use newslens_common::{error::Result, NewsLensError, NewsRecord};

use crate::report::format_report;
use crate::telegram::{Message, TelegramClient};

const HELP_TEXT: &str = "Send me a link to a Straits Times or CNA article and I will \
summarise it, check its facts, and score its sentiment, emotion, and propaganda.\n\n\
Commands:\n/start - introduction\n/help - this message";

pub struct Bot {
    telegram: TelegramClient,
    app: AppClient,
    web_url: String,
}

impl Bot {
    pub fn new(telegram: TelegramClient, application_url: &str, web_url: &str) -> Self {
        Self {
            telegram,
            app: AppClient::new(application_url),
            web_url: web_url.trim_end_matches('/').to_string(),
        }
    }

    /// Long-poll loop. Runs until the process is stopped; transient Telegram
    /// errors are logged and polling resumes.
    pub async fn run(&self) {
        let mut offset = 0i64;
        loop {
            let updates = match self.telegram.get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    warn!(error = %e, "Failed to fetch updates");
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                if let Some(message) = update.message {
                    if let Err(e) = self.handle_message(&message).await {
                        warn!(chat_id = message.chat.id, error = %e, "Failed to handle message");
                    }
                }
            }
        }
    }

    async fn handle_message(&self, message: &Message) -> Result<()> {
        let chat_id = message.chat.id;
        let text = match message.text.as_deref() {
            Some(text) => text.trim(),
            None => return Ok(()),
        };

        match classify(text) {
            Incoming::Start => {
                let name = message
                    .from
                    .as_ref()
                    .map(|u| u.first_name.as_str())
                    .unwrap_or("there");
                self.telegram
                    .send_message(
                        chat_id,
                        &format!("Hello {name}! Send me a news article URL to analyse it."),
                    )
                    .await
            }
            Incoming::Help => self.telegram.send_message(chat_id, HELP_TEXT).await,
            Incoming::Url(url) => self.handle_url(chat_id, url).await,
            Incoming::Other => {
                self.telegram
                    .send_message(chat_id, "Please only send URLs.")
                    .await
            }
        }
    }

    async fn handle_url(&self, chat_id: i64, url: &str) -> Result<()> {
        info!(chat_id, url = %url, "Processing article for chat");
        self.telegram
            .send_message(
                chat_id,
                "Processing... Analysis can take a few minutes, hang tight.",
            )
            .await?;

        match self.app.analyse(url).await {
            Ok(record) => {
                self.telegram
                    .send_message(chat_id, &format_report(&record, &self.web_url))
                    .await
            }
            Err(NewsLensError::Validation(_)) => {
                self.telegram
                    .send_message(
                        chat_id,
                        "Sorry, I could not read that article. I only support \
                         Straits Times and CNA links.",
                    )
                    .await
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Analysis request failed");
                self.telegram
                    .send_message(chat_id, "Sorry, something went wrong. Please try again later.")
                    .await
            }
        }
    }
}

enum Incoming<'a> {
    Start,
    Help,
    Url(&'a str),
    Other,
}

fn classify(text: &str) -> Incoming<'_> {
    if text == "/start" {
        Incoming::Start
    } else if text == "/help" {
        Incoming::Help
    } else if text.starts_with("http://") || text.starts_with("https://") {
        Incoming::Url(text)
    } else {
        Incoming::Other
    }
}

/// Client for the application service's synchronous analysis endpoint.
struct AppClient {
    http: reqwest::Client,
    base_url: String,
}

impl AppClient {
    fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::builder()
                // Synchronous analysis of a long article is slow.
                .timeout(Duration::from_secs(600))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn analyse(&self, url: &str) -> Result<NewsRecord> {
        let resp = self
            .http
            .post(format!("{}/application/new_query", self.base_url))
            .json(&serde_json::json!({"url": url, "background": false}))
            .send()
            .await
            .map_err(|e| NewsLensError::Downstream(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::BAD_REQUEST {
            return Err(NewsLensError::Validation("Invalid URL".to_string()));
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(NewsLensError::Downstream(format!(
                "status {status}: {body}"
            )));
        }
        resp.json()
            .await
            .map_err(|e| NewsLensError::Downstream(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_commands_urls_and_noise() {
        assert!(matches!(classify("/start"), Incoming::Start));
        assert!(matches!(classify("/help"), Incoming::Help));
        assert!(matches!(
            classify("https://www.channelnewsasia.com/x"),
            Incoming::Url(_)
        ));
        assert!(matches!(classify("hello bot"), Incoming::Other));
    }
}
