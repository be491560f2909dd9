//! Reqwest clients for the downstream services, one per trait seam.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use newslens_common::{
    error::Result, ArticleData, FactCheckFinding, FactCheckItem, LatestArticles, NewsLensError,
    NewsRecord, ServiceUrls,
};

use crate::traits::{AnalysisBackend, ArticleSource, NewsBackend};

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(600))
        .build()
        .expect("Failed to build HTTP client")
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(NewsLensError::Downstream(format!(
            "status {status}: {body}"
        )));
    }
    Ok(resp)
}

// --- Store ---

pub struct HttpNewsStore {
    http: reqwest::Client,
    base_url: String,
}

impl HttpNewsStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn put_field(&self, path: &str, body: serde_json::Value) -> Result<()> {
        let resp = self
            .http
            .put(format!("{}{path}", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| NewsLensError::Downstream(e.to_string()))?;
        check_status(resp).await?;
        Ok(())
    }
}

#[async_trait]
impl NewsBackend for HttpNewsStore {
    async fn check_exists(&self, url: &str) -> Result<bool> {
        let resp = self
            .http
            .post(format!("{}/database/check_exists", self.base_url))
            .json(&serde_json::json!({"url": url}))
            .send()
            .await
            .map_err(|e| NewsLensError::Downstream(e.to_string()))?;

        // The store answers 404 with {"exists": false} for unknown URLs.
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        let resp = check_status(resp).await?;

        #[derive(Deserialize)]
        struct Exists {
            exists: bool,
        }
        let body: Exists = resp
            .json()
            .await
            .map_err(|e| NewsLensError::Downstream(e.to_string()))?;
        Ok(body.exists)
    }

    async fn get_news(&self, url: &str) -> Result<Option<NewsRecord>> {
        let resp = self
            .http
            .post(format!("{}/database/getByURL", self.base_url))
            .json(&serde_json::json!({"url": url}))
            .send()
            .await
            .map_err(|e| NewsLensError::Downstream(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = check_status(resp).await?;
        let record = resp
            .json()
            .await
            .map_err(|e| NewsLensError::Downstream(e.to_string()))?;
        Ok(Some(record))
    }

    async fn get_news_by_id(&self, news_id: &str) -> Result<Option<NewsRecord>> {
        let resp = self
            .http
            .get(format!("{}/database/getByID/{news_id}", self.base_url))
            .send()
            .await
            .map_err(|e| NewsLensError::Downstream(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = check_status(resp).await?;
        let record = resp
            .json()
            .await
            .map_err(|e| NewsLensError::Downstream(e.to_string()))?;
        Ok(Some(record))
    }

    async fn create_news(&self, url: &str, title: &str, content: &str) -> Result<NewsRecord> {
        let resp = self
            .http
            .post(format!("{}/database", self.base_url))
            .json(&serde_json::json!({"url": url, "title": title, "content": content}))
            .send()
            .await
            .map_err(|e| NewsLensError::Downstream(e.to_string()))?;
        check_status(resp).await?;

        self.get_news(url)
            .await?
            .ok_or_else(|| NewsLensError::Database("Record missing after create".to_string()))
    }

    async fn save_sentiment(&self, url: &str, result: &serde_json::Value) -> Result<()> {
        self.put_field(
            "/database/sentiment",
            serde_json::json!({"url": url, "sentiment_result": result}),
        )
        .await
    }

    async fn save_emotion(&self, url: &str, result: &serde_json::Value) -> Result<()> {
        self.put_field(
            "/database/emotion",
            serde_json::json!({"url": url, "emotion_result": result}),
        )
        .await
    }

    async fn save_propaganda(&self, url: &str, result: &serde_json::Value) -> Result<()> {
        self.put_field(
            "/database/propaganda",
            serde_json::json!({"url": url, "propaganda_result": result}),
        )
        .await
    }

    async fn save_factcheck(&self, url: &str, items: &[FactCheckItem]) -> Result<()> {
        self.put_field(
            "/database/factcheck",
            serde_json::json!({"url": url, "factcheck_result": items}),
        )
        .await
    }

    async fn save_summary(&self, url: &str, summary: &str) -> Result<()> {
        self.put_field(
            "/database/summarise",
            serde_json::json!({"url": url, "summarise_result": summary}),
        )
        .await
    }

    async fn save_data_summary(&self, url: &str, summary: &serde_json::Value) -> Result<()> {
        self.put_field(
            "/database/ModelDataSummary",
            serde_json::json!({"url": url, "data_summary": summary}),
        )
        .await
    }
}

// --- Scraper ---

pub struct HttpArticleSource {
    http: reqwest::Client,
    base_url: String,
}

impl HttpArticleSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ArticleSource for HttpArticleSource {
    async fn extract(&self, url: &str) -> Result<ArticleData> {
        let resp = self
            .http
            .get(format!("{}/scraper/get-article", self.base_url))
            .query(&[("url", url)])
            .send()
            .await
            .map_err(|e| NewsLensError::Downstream(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::BAD_REQUEST {
            return Err(NewsLensError::Validation("Invalid URL format".to_string()));
        }
        let resp = check_status(resp).await?;
        resp.json()
            .await
            .map_err(|e| NewsLensError::Downstream(e.to_string()))
    }

    async fn latest(&self, per_source: usize) -> Result<LatestArticles> {
        let resp = self
            .http
            .get(format!("{}/scraper/get-latest-articles", self.base_url))
            .query(&[("num_articles", per_source)])
            .send()
            .await
            .map_err(|e| NewsLensError::Downstream(e.to_string()))?;
        let resp = check_status(resp).await?;
        resp.json()
            .await
            .map_err(|e| NewsLensError::Downstream(e.to_string()))
    }
}

// --- Analysis services ---

pub struct HttpAnalysisBackend {
    http: reqwest::Client,
    urls: ServiceUrls,
}

impl HttpAnalysisBackend {
    pub fn new(urls: ServiceUrls) -> Self {
        Self {
            http: http_client(),
            urls,
        }
    }

    async fn post_json(&self, url: String, body: serde_json::Value) -> Result<serde_json::Value> {
        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| NewsLensError::Downstream(e.to_string()))?;
        let resp = check_status(resp).await?;
        resp.json()
            .await
            .map_err(|e| NewsLensError::Downstream(e.to_string()))
    }

    fn field(mut value: serde_json::Value, field: &str) -> Result<serde_json::Value> {
        value
            .get_mut(field)
            .map(serde_json::Value::take)
            .ok_or_else(|| NewsLensError::Downstream(format!("response missing `{field}`")))
    }
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisBackend {
    async fn sentiment(&self, text: &str) -> Result<serde_json::Value> {
        let value = self
            .post_json(
                format!("{}/sentiment/analyze_sentiment", self.urls.sentiment_url),
                serde_json::json!({"text": text}),
            )
            .await?;
        Self::field(value, "sentiment_result")
    }

    async fn emotion(&self, text: &str) -> Result<serde_json::Value> {
        let value = self
            .post_json(
                format!("{}/emotion/analyze_emotion", self.urls.emotion_url),
                serde_json::json!({"text": text}),
            )
            .await?;
        Self::field(value, "emotion_result")
    }

    async fn propaganda(&self, text: &str) -> Result<serde_json::Value> {
        let value = self
            .post_json(
                format!("{}/propaganda/analyze_propaganda", self.urls.propaganda_url),
                serde_json::json!({"text": text}),
            )
            .await?;
        Self::field(value, "propaganda_result")
    }

    async fn fact_check(&self, title: &str, content: &str) -> Result<Vec<FactCheckFinding>> {
        let value = self
            .post_json(
                format!("{}/factcheck/predict/fact-check", self.urls.factcheck_url),
                serde_json::json!({"title": title, "content": content}),
            )
            .await?;
        let response = Self::field(value, "response")?;
        serde_json::from_value(response).map_err(|e| NewsLensError::Downstream(e.to_string()))
    }

    async fn summarise(&self, content: &str) -> Result<String> {
        let value = self
            .post_json(
                format!("{}/factcheck/summarise", self.urls.factcheck_url),
                serde_json::json!({"content": content}),
            )
            .await?;
        let response = Self::field(value, "response")?;
        response
            .as_str()
            .map(String::from)
            .ok_or_else(|| NewsLensError::Downstream("summary is not a string".to_string()))
    }

    async fn summarise_model_data(&self, data: &serde_json::Value) -> Result<serde_json::Value> {
        let value = self
            .post_json(
                format!(
                    "{}/factcheck/summarise/model-data",
                    self.urls.factcheck_url
                ),
                data.clone(),
            )
            .await?;
        Self::field(value, "response")
    }
}
