use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The per-URL document that accumulates scrape and analysis results.
///
/// Every analysis field is written independently by its own service call;
/// a record may stay partially filled forever if a downstream step fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NewsRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub url: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion_result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub propaganda_result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factcheck_result: Option<Vec<FactCheckItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summarise_result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_summary: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// One fact-checked claim as stored on the record, after sanitisation
/// by the application layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheckItem {
    pub statement: String,
    pub correctness: String,
    pub explanation: String,
    pub citations: Vec<String>,
}

/// Raw fact-check output from the fact-check service. The `accuracy`
/// field is mapped to `FactCheckItem::correctness` downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheckFinding {
    pub statement: String,
    #[serde(default)]
    pub accuracy: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub citations: Vec<String>,
}

/// Extracted article content returned by the scraper service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleData {
    pub headline: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
}

/// Latest article URLs grouped by provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LatestArticles {
    pub straitstimes: Vec<String>,
    pub cna: Vec<String>,
}

// --- Request payloads ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextInput {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlInput {
    pub url: String,
}

/// Body of `POST /application/new_query`. `background` defaults to true:
/// analysis runs in a spawned task and the initial save returns immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub url: String,
    #[serde(default = "default_background")]
    pub background: bool,
}

fn default_background() -> bool {
    true
}

// --- Analysis service responses ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentResponse {
    pub sentiment_result: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionResponse {
    pub emotion_result: EmotionResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionResult {
    pub weighted_avg: BTreeMap<String, f64>,
    pub majority_vote: Vec<(String, usize)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagandaResponse {
    pub propaganda_result: PropagandaResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagandaResult {
    pub non_propaganda_probability: f64,
    pub propaganda_probability: f64,
    /// `[technique, span text]` pairs for flagged passages.
    pub formatted_result: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_request_background_defaults_to_true() {
        let req: QueryRequest = serde_json::from_str(r#"{"url":"https://example.com"}"#).unwrap();
        assert!(req.background);

        let req: QueryRequest =
            serde_json::from_str(r#"{"url":"https://example.com","background":false}"#).unwrap();
        assert!(!req.background);
    }

    #[test]
    fn news_record_omits_missing_analysis_fields() {
        let record = NewsRecord {
            url: "https://example.com/a".into(),
            title: "Title".into(),
            content: "Body".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("sentiment_result").is_none());
        assert!(json.get("factcheck_result").is_none());
        assert_eq!(json["url"], "https://example.com/a");
    }

    #[test]
    fn fact_check_finding_tolerates_missing_fields() {
        let finding: FactCheckFinding =
            serde_json::from_str(r#"{"statement":"The sky is green"}"#).unwrap();
        assert_eq!(finding.statement, "The sky is green");
        assert!(finding.accuracy.is_empty());
        assert!(finding.citations.is_empty());
    }
}
