//! End-to-end pipeline tests against in-memory fakes of the store, scraper,
//! and analysis services.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use newslens_app::traits::{AnalysisBackend, ArticleSource, NewsBackend};
use newslens_app::{router, AppState, Pipeline};
use newslens_common::{
    error::Result, ArticleData, FactCheckFinding, FactCheckItem, LatestArticles, NewsLensError,
    NewsRecord,
};

#[derive(Default)]
struct MemoryStore {
    records: Mutex<HashMap<String, NewsRecord>>,
}

impl MemoryStore {
    fn with_record(url: &str, title: &str, content: &str) -> Self {
        let store = Self::default();
        {
            let mut records = store.records.lock().unwrap();
            records.insert(
                url.to_string(),
                NewsRecord {
                    id: Some(Uuid::new_v4()),
                    url: url.to_string(),
                    title: title.to_string(),
                    content: content.to_string(),
                    ..Default::default()
                },
            );
        }
        store
    }

    fn record(&self, url: &str) -> Option<NewsRecord> {
        self.records.lock().unwrap().get(url).cloned()
    }

    fn with<F>(&self, url: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut NewsRecord),
    {
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(url)
            .ok_or_else(|| NewsLensError::Database("no such record".to_string()))?;
        f(record);
        Ok(())
    }
}

#[async_trait]
impl NewsBackend for MemoryStore {
    async fn check_exists(&self, url: &str) -> Result<bool> {
        Ok(self.records.lock().unwrap().contains_key(url))
    }

    async fn get_news(&self, url: &str) -> Result<Option<NewsRecord>> {
        Ok(self.record(url))
    }

    async fn get_news_by_id(&self, news_id: &str) -> Result<Option<NewsRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .values()
            .find(|r| r.id.map(|id| id.to_string()).as_deref() == Some(news_id))
            .cloned())
    }

    async fn create_news(&self, url: &str, title: &str, content: &str) -> Result<NewsRecord> {
        let record = NewsRecord {
            id: Some(Uuid::new_v4()),
            url: url.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        };
        self.records
            .lock()
            .unwrap()
            .insert(url.to_string(), record.clone());
        Ok(record)
    }

    async fn save_sentiment(&self, url: &str, result: &serde_json::Value) -> Result<()> {
        self.with(url, |r| r.sentiment_result = Some(result.clone()))
    }

    async fn save_emotion(&self, url: &str, result: &serde_json::Value) -> Result<()> {
        self.with(url, |r| r.emotion_result = Some(result.clone()))
    }

    async fn save_propaganda(&self, url: &str, result: &serde_json::Value) -> Result<()> {
        self.with(url, |r| r.propaganda_result = Some(result.clone()))
    }

    async fn save_factcheck(&self, url: &str, items: &[FactCheckItem]) -> Result<()> {
        self.with(url, |r| r.factcheck_result = Some(items.to_vec()))
    }

    async fn save_summary(&self, url: &str, summary: &str) -> Result<()> {
        self.with(url, |r| r.summarise_result = Some(summary.to_string()))
    }

    async fn save_data_summary(&self, url: &str, summary: &serde_json::Value) -> Result<()> {
        self.with(url, |r| r.data_summary = Some(summary.clone()))
    }
}

struct StubScraper {
    article: Option<ArticleData>,
    calls: AtomicUsize,
}

impl StubScraper {
    fn returning(headline: &str, body: &str) -> Self {
        Self {
            article: Some(ArticleData {
                headline: headline.to_string(),
                body: body.to_string(),
                publish_date: Some("2025-03-01".to_string()),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    fn empty() -> Self {
        Self {
            article: Some(ArticleData {
                headline: String::new(),
                body: String::new(),
                publish_date: None,
            }),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ArticleSource for StubScraper {
    async fn extract(&self, _url: &str) -> Result<ArticleData> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.article
            .clone()
            .ok_or_else(|| NewsLensError::Scraping("no article".to_string()))
    }

    async fn latest(&self, _per_source: usize) -> Result<LatestArticles> {
        Ok(LatestArticles::default())
    }
}

/// Analysis fake that can be told to fail a single named step.
struct StubAnalysis {
    fail_step: Option<&'static str>,
}

impl StubAnalysis {
    fn ok() -> Self {
        Self { fail_step: None }
    }

    fn failing_at(step: &'static str) -> Self {
        Self {
            fail_step: Some(step),
        }
    }

    fn guard(&self, step: &'static str) -> Result<()> {
        if self.fail_step == Some(step) {
            return Err(NewsLensError::Inference(format!("{step} unavailable")));
        }
        Ok(())
    }
}

#[async_trait]
impl AnalysisBackend for StubAnalysis {
    async fn sentiment(&self, _text: &str) -> Result<serde_json::Value> {
        self.guard("sentiment")?;
        Ok(serde_json::json!({"positive": 0.7, "negative": 0.1, "neutral": 0.2}))
    }

    async fn emotion(&self, _text: &str) -> Result<serde_json::Value> {
        self.guard("emotion")?;
        Ok(serde_json::json!({"weighted_avg": {"joy": 0.6}, "majority_vote": [["joy", 3]]}))
    }

    async fn propaganda(&self, _text: &str) -> Result<serde_json::Value> {
        self.guard("propaganda")?;
        Ok(serde_json::json!({
            "non_propaganda_probability": 0.9,
            "propaganda_probability": 0.1,
            "formatted_result": []
        }))
    }

    async fn fact_check(&self, _title: &str, _content: &str) -> Result<Vec<FactCheckFinding>> {
        self.guard("fact_check")?;
        Ok(vec![FactCheckFinding {
            statement: "GDP grew 4% last quarter".to_string(),
            accuracy: "Factual".to_string(),
            explanation: "Matches official statistics.".to_string(),
            citations: vec!["https://www.singstat.gov.sg".to_string()],
        }])
    }

    async fn summarise(&self, _content: &str) -> Result<String> {
        self.guard("summarise")?;
        Ok("- Point one\n- Point two".to_string())
    }

    async fn summarise_model_data(&self, _data: &serde_json::Value) -> Result<serde_json::Value> {
        self.guard("summarise_model_data")?;
        Ok(serde_json::json!({
            "sentiment_summary": "Mostly positive.",
            "emotion_summary": "Joyful.",
            "propaganda_summary": "Low."
        }))
    }
}

fn pipeline(
    store: Arc<MemoryStore>,
    scraper: Arc<StubScraper>,
    analysis: Arc<StubAnalysis>,
) -> Pipeline {
    Pipeline::new(store, scraper, analysis)
}

const URL: &str = "https://www.straitstimes.com/singapore/some-article";

#[tokio::test]
async fn synchronous_run_fills_every_analysis_field() {
    let store = Arc::new(MemoryStore::default());
    let scraper = Arc::new(StubScraper::returning("Headline", "Body text here."));
    let p = pipeline(store.clone(), scraper, Arc::new(StubAnalysis::ok()));

    let record = p.process_url(URL, false).await.unwrap();

    assert_eq!(record.title, "Headline");
    assert!(record.sentiment_result.is_some());
    assert!(record.emotion_result.is_some());
    assert!(record.propaganda_result.is_some());
    assert_eq!(record.summarise_result.as_deref(), Some("- Point one\n- Point two"));
    assert!(record.data_summary.is_some());

    let items = record.factcheck_result.unwrap();
    assert_eq!(items.len(), 1);
    // Raw `accuracy` values are stored lower-cased as `correctness`.
    assert_eq!(items[0].correctness, "factual");
}

#[tokio::test]
async fn known_url_short_circuits_without_scraping() {
    let store = Arc::new(MemoryStore::with_record(URL, "Seen before", "Old body"));
    let scraper = Arc::new(StubScraper::returning("Fresh", "Fresh body"));
    let p = pipeline(store, scraper.clone(), Arc::new(StubAnalysis::ok()));

    let record = p.process_url(URL, false).await.unwrap();

    assert_eq!(record.title, "Seen before");
    assert_eq!(scraper.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_extraction_is_a_validation_error_and_stores_nothing() {
    let store = Arc::new(MemoryStore::default());
    let p = pipeline(
        store.clone(),
        Arc::new(StubScraper::empty()),
        Arc::new(StubAnalysis::ok()),
    );

    let err = p.process_url(URL, false).await.unwrap_err();
    assert!(matches!(err, NewsLensError::Validation(_)));
    assert!(store.record(URL).is_none());
}

#[tokio::test]
async fn mid_chain_failure_keeps_earlier_results_and_skips_later_steps() {
    let store = Arc::new(MemoryStore::default());
    let p = pipeline(
        store.clone(),
        Arc::new(StubScraper::returning("Headline", "Body")),
        Arc::new(StubAnalysis::failing_at("propaganda")),
    );

    // The synchronous path swallows analysis errors and returns the record.
    let record = p.process_url(URL, false).await.unwrap();

    assert!(record.sentiment_result.is_some());
    assert!(record.emotion_result.is_some());
    assert!(record.propaganda_result.is_none());
    assert!(record.summarise_result.is_none());
    assert!(record.data_summary.is_none());
    assert!(record.factcheck_result.is_none());
}

#[tokio::test]
async fn stream_stays_silent_for_unknown_record_ids() {
    let store = Arc::new(MemoryStore::default());
    let p = pipeline(
        store,
        Arc::new(StubScraper::empty()),
        Arc::new(StubAnalysis::ok()),
    );
    let app = router(Arc::new(AppState { pipeline: p }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let mut resp = reqwest::get(format!(
        "http://{addr}/application/stream_news?news_id={}",
        Uuid::new_v4()
    ))
    .await
    .unwrap();
    assert!(resp.status().is_success());

    // The stream keeps polling rather than closing on a missing record:
    // no event (and in particular no close event) arrives.
    let chunk = tokio::time::timeout(Duration::from_secs(2), resp.chunk()).await;
    assert!(
        chunk.is_err(),
        "stream for an unknown record should stay open and silent"
    );
}

#[tokio::test]
async fn background_run_returns_initial_record_then_completes() {
    let store = Arc::new(MemoryStore::default());
    let p = pipeline(
        store.clone(),
        Arc::new(StubScraper::returning("Headline", "Body")),
        Arc::new(StubAnalysis::ok()),
    );

    let initial = p.process_url(URL, true).await.unwrap();
    assert_eq!(initial.title, "Headline");
    assert!(initial.factcheck_result.is_none());

    // Poll until the spawned analysis finishes.
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(record) = store.record(URL) {
            if record.factcheck_result.is_some() {
                assert!(record.sentiment_result.is_some());
                assert!(record.data_summary.is_some());
                break;
            }
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "background analysis did not complete in time"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
