pub mod error;

pub use error::{HfError, Result};

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

const HF_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";

/// One label with its classifier score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// One aggregated token-classification span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSpan {
    pub entity_group: String,
    pub score: f64,
    pub word: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

pub struct HfClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HfClient {
    pub fn new(api_key: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: HF_INFERENCE_URL.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Run a text-classification model. Returns the label scores for the input.
    ///
    /// The API returns one row of `{label, score}` objects per input; single-input
    /// requests get a single row back.
    pub async fn classify(&self, model: &str, text: &str) -> Result<Vec<LabelScore>> {
        debug!(model = %model, chars = text.len(), "HF classification request");

        let rows: Vec<Vec<LabelScore>> = self.post(model, text).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| HfError::Decode("empty classification response".to_string()))
    }

    /// Run a token-classification model with simple aggregation. Returns the
    /// tagged spans found in the input.
    pub async fn token_classify(&self, model: &str, text: &str) -> Result<Vec<TokenSpan>> {
        debug!(model = %model, chars = text.len(), "HF token classification request");

        self.post(model, text).await
    }

    async fn post<T: serde::de::DeserializeOwned>(&self, model: &str, text: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, model);
        let body = InferenceRequest {
            inputs: text,
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(HfError::Api {
                status: status.as_u16(),
                message,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| HfError::Decode(e.to_string()))
    }
}
