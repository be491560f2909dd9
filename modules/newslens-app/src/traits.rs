//! Seams between the orchestration pipeline and the downstream services.
//! Production wiring uses the HTTP clients in `clients.rs`; tests substitute
//! in-memory fakes.

use async_trait::async_trait;

use newslens_common::{
    error::Result, ArticleData, FactCheckFinding, FactCheckItem, LatestArticles, NewsRecord,
};

/// The document-store service.
#[async_trait]
pub trait NewsBackend: Send + Sync {
    async fn check_exists(&self, url: &str) -> Result<bool>;
    async fn get_news(&self, url: &str) -> Result<Option<NewsRecord>>;
    async fn get_news_by_id(&self, news_id: &str) -> Result<Option<NewsRecord>>;
    async fn create_news(&self, url: &str, title: &str, content: &str) -> Result<NewsRecord>;

    async fn save_sentiment(&self, url: &str, result: &serde_json::Value) -> Result<()>;
    async fn save_emotion(&self, url: &str, result: &serde_json::Value) -> Result<()>;
    async fn save_propaganda(&self, url: &str, result: &serde_json::Value) -> Result<()>;
    async fn save_factcheck(&self, url: &str, items: &[FactCheckItem]) -> Result<()>;
    async fn save_summary(&self, url: &str, summary: &str) -> Result<()>;
    async fn save_data_summary(&self, url: &str, summary: &serde_json::Value) -> Result<()>;
}

/// The scraper service.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn extract(&self, url: &str) -> Result<ArticleData>;
    async fn latest(&self, per_source: usize) -> Result<LatestArticles>;
}

/// The analysis fan-out targets: three model services plus the LLM service.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn sentiment(&self, text: &str) -> Result<serde_json::Value>;
    async fn emotion(&self, text: &str) -> Result<serde_json::Value>;
    async fn propaganda(&self, text: &str) -> Result<serde_json::Value>;
    async fn fact_check(&self, title: &str, content: &str) -> Result<Vec<FactCheckFinding>>;
    async fn summarise(&self, content: &str) -> Result<String>;
    async fn summarise_model_data(&self, data: &serde_json::Value) -> Result<serde_json::Value>;
}
