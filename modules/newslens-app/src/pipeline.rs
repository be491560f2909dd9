//! The process_url orchestration: check existence, extract, persist, then
//! fan out to the six analysis steps. Sequential and best-effort — each step
//! writes its own result back to the store keyed by URL, the first failure
//! aborts the remaining steps, and whatever was already written stays.

use std::sync::Arc;

use tracing::{error, info, warn};

use newslens_common::{error::Result, FactCheckFinding, FactCheckItem, NewsLensError, NewsRecord};

use crate::traits::{AnalysisBackend, ArticleSource, NewsBackend};

/// Map raw fact-check findings onto stored items: `accuracy` becomes a
/// lower-cased `correctness`, statements without text are dropped.
pub fn sanitize_factcheck(findings: Vec<FactCheckFinding>) -> Vec<FactCheckItem> {
    findings
        .into_iter()
        .filter(|f| !f.statement.is_empty())
        .map(|f| FactCheckItem {
            statement: f.statement,
            correctness: f.accuracy.to_lowercase(),
            explanation: f.explanation,
            citations: f.citations,
        })
        .collect()
}

#[derive(Clone)]
pub struct Pipeline {
    store: Arc<dyn NewsBackend>,
    scraper: Arc<dyn ArticleSource>,
    analysis: Arc<dyn AnalysisBackend>,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn NewsBackend>,
        scraper: Arc<dyn ArticleSource>,
        analysis: Arc<dyn AnalysisBackend>,
    ) -> Self {
        Self {
            store,
            scraper,
            analysis,
        }
    }

    pub fn store(&self) -> &Arc<dyn NewsBackend> {
        &self.store
    }

    pub fn scraper(&self) -> &Arc<dyn ArticleSource> {
        &self.scraper
    }

    /// Process a news URL. Returns the stored record: the completed one when
    /// the URL was already known or `background` is false, otherwise the
    /// initial scrape-only record while analysis continues in a spawned task.
    pub async fn process_url(&self, url: &str, background: bool) -> Result<NewsRecord> {
        if self.store.check_exists(url).await? {
            info!(url = %url, "News already exists");
            return self
                .store
                .get_news(url)
                .await?
                .ok_or_else(|| NewsLensError::Database("Record vanished after check".to_string()));
        }

        info!(url = %url, "New article, processing");
        let article = self.scraper.extract(url).await?;
        if article.headline.is_empty() || article.body.is_empty() {
            return Err(NewsLensError::Validation("Invalid URL".to_string()));
        }

        let initial = self
            .store
            .create_news(url, &article.headline, &article.body)
            .await?;

        if background {
            let pipeline = self.clone();
            let url = url.to_string();
            tokio::spawn(async move {
                if let Err(e) = pipeline
                    .run_analysis(&url, &article.headline, &article.body)
                    .await
                {
                    error!(url = %url, error = %e, "Background analysis failed");
                }
            });
            return Ok(initial);
        }

        if let Err(e) = self
            .run_analysis(url, &article.headline, &article.body)
            .await
        {
            error!(url = %url, error = %e, "Analysis failed");
        }

        self.store
            .get_news(url)
            .await?
            .ok_or_else(|| NewsLensError::Database("Record vanished after analysis".to_string()))
    }

    /// The six-step fan-out. Steps run in a fixed order; the first failure
    /// stops the chain and leaves the record partially filled.
    pub async fn run_analysis(&self, url: &str, title: &str, text: &str) -> Result<()> {
        self.step_sentiment(url, text).await?;
        self.step_emotion(url, text).await?;
        self.step_propaganda(url, text).await?;
        self.step_summarise(url, text).await?;
        self.step_data_summary(url).await?;
        self.step_fact_check(url, title, text).await?;
        info!(url = %url, "Finished processing");
        Ok(())
    }

    async fn step_sentiment(&self, url: &str, text: &str) -> Result<()> {
        let result = self.analysis.sentiment(text).await?;
        self.store.save_sentiment(url, &result).await
    }

    async fn step_emotion(&self, url: &str, text: &str) -> Result<()> {
        let result = self.analysis.emotion(text).await?;
        self.store.save_emotion(url, &result).await
    }

    async fn step_propaganda(&self, url: &str, text: &str) -> Result<()> {
        let result = self.analysis.propaganda(text).await?;
        self.store.save_propaganda(url, &result).await
    }

    async fn step_summarise(&self, url: &str, text: &str) -> Result<()> {
        let summary = self.analysis.summarise(text).await?;
        self.store.save_summary(url, &summary).await
    }

    /// Reads back the record accumulated so far and asks the LLM service for
    /// a holistic summary of the prior analysis results.
    async fn step_data_summary(&self, url: &str) -> Result<()> {
        let record = self
            .store
            .get_news(url)
            .await?
            .ok_or_else(|| NewsLensError::Database("Record missing for data summary".to_string()))?;

        let data = serde_json::json!({
            "sentiment_result": record.sentiment_result,
            "emotion_result": record.emotion_result,
            "propaganda_result": record.propaganda_result,
            "summarise_result": record.summarise_result,
        });

        let summary = self.analysis.summarise_model_data(&data).await?;
        self.store.save_data_summary(url, &summary).await
    }

    async fn step_fact_check(&self, url: &str, title: &str, text: &str) -> Result<()> {
        let findings = self.analysis.fact_check(title, text).await?;
        let items = sanitize_factcheck(findings);
        if items.is_empty() {
            warn!(url = %url, "No fact-check results returned");
        }
        self.store.save_factcheck(url, &items).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_maps_accuracy_to_lowercase_correctness() {
        let findings = vec![FactCheckFinding {
            statement: "GDP grew 4%".into(),
            accuracy: "Factual".into(),
            explanation: "Matches official figures.".into(),
            citations: vec!["https://www.singstat.gov.sg".into()],
        }];
        let items = sanitize_factcheck(findings);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].correctness, "factual");
    }

    #[test]
    fn sanitize_drops_empty_statements() {
        let findings = vec![FactCheckFinding {
            statement: String::new(),
            accuracy: "factual".into(),
            explanation: String::new(),
            citations: vec![],
        }];
        assert!(sanitize_factcheck(findings).is_empty());
    }
}
