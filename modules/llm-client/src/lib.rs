pub mod error;
pub mod types;
pub mod util;

pub use error::{LlmError, Result};
pub use types::{ChatMessage, ChatRequest, ChatResponse, Choice};
pub use util::{extract_json_payload, strip_code_blocks, strip_think_blocks};

use std::time::Duration;

use tracing::debug;

/// Well-known chat-completions endpoints.
pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const PERPLEXITY_API_URL: &str = "https://api.perplexity.ai/chat/completions";

/// Client for one OpenAI-compatible chat-completions endpoint.
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl ChatClient {
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(180))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        debug!(model = %request.model, endpoint = %self.endpoint, "chat completion request");

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }

    /// Run a chat completion and return the first choice's content, with
    /// DeepSeek reasoning blocks stripped.
    pub async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let response = self.chat(request).await?;
        let content = response.content().ok_or(LlmError::EmptyResponse)?;
        Ok(strip_think_blocks(content))
    }
}
