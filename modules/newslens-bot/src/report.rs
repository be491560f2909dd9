//! Renders a stored news record into the plain-text report the bot replies
//! with.

use std::collections::BTreeMap;

use newslens_common::NewsRecord;

/// Build the chat reply for a fully (or partially) analysed record. Sections
/// with no data yet are skipped rather than rendered empty.
pub fn format_report(record: &NewsRecord, web_url: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!("📰 {}\n", record.title));

    if let Some(summary) = record.summarise_result.as_deref() {
        out.push_str("\nSummary:\n");
        for point in summary_points(summary) {
            out.push_str(&format!("• {point}\n"));
        }
    }

    if let Some(items) = record.factcheck_result.as_deref() {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for item in items {
            *counts.entry(item.correctness.as_str()).or_default() += 1;
        }
        out.push_str(&format!("\nFact check ({} statements):\n", items.len()));
        for (verdict, count) in counts {
            out.push_str(&format!("  {verdict}: {count}\n"));
        }
    }

    if let Some(scores) = numeric_map(record.sentiment_result.as_ref()) {
        out.push_str("\nSentiment:\n");
        for (label, score) in sorted_desc(scores) {
            out.push_str(&format!("  {label}: {:.1}%\n", score * 100.0));
        }
    }

    let emotions = record
        .emotion_result
        .as_ref()
        .and_then(|v| v.get("weighted_avg"))
        .and_then(|v| numeric_map(Some(v)));
    if let Some(scores) = emotions {
        out.push_str("\nTop emotions:\n");
        for (label, score) in sorted_desc(scores).into_iter().take(5) {
            out.push_str(&format!("  {label}: {:.1}%\n", score * 100.0));
        }
    }

    let propaganda = record
        .propaganda_result
        .as_ref()
        .and_then(|v| v.get("propaganda_probability"))
        .and_then(serde_json::Value::as_f64);
    if let Some(p) = propaganda {
        out.push_str(&format!("\nPropaganda likelihood: {:.1}%\n", p * 100.0));
    }

    if let Some(id) = record.id {
        out.push_str(&format!("\nFull results: {web_url}/news/{id}\n"));
    }

    out
}

/// One bullet per summary paragraph, tolerating models that already emit
/// their own bullet markers.
fn summary_points(summary: &str) -> impl Iterator<Item = &str> {
    summary
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches("- ")
                .trim_start_matches("* ")
                .trim_start_matches("• ")
        })
        .filter(|line| !line.is_empty())
}

fn numeric_map(value: Option<&serde_json::Value>) -> Option<Vec<(String, f64)>> {
    let object = value?.as_object()?;
    let mut scores = Vec::with_capacity(object.len());
    for (label, score) in object {
        scores.push((label.clone(), score.as_f64()?));
    }
    Some(scores)
}

fn sorted_desc(mut scores: Vec<(String, f64)>) -> Vec<(String, f64)> {
    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use newslens_common::FactCheckItem;
    use uuid::Uuid;

    fn record() -> NewsRecord {
        NewsRecord {
            id: Some(Uuid::nil()),
            url: "https://www.straitstimes.com/a".into(),
            title: "Budget passed".into(),
            content: "Body".into(),
            sentiment_result: Some(
                serde_json::json!({"positive": 0.7, "negative": 0.1, "neutral": 0.2}),
            ),
            emotion_result: Some(serde_json::json!({
                "weighted_avg": {
                    "joy": 0.4, "optimism": 0.3, "neutral": 0.1,
                    "anger": 0.05, "fear": 0.05, "sadness": 0.02
                },
                "majority_vote": [["joy", 2]]
            })),
            propaganda_result: Some(serde_json::json!({
                "non_propaganda_probability": 0.92,
                "propaganda_probability": 0.08,
                "formatted_result": []
            })),
            factcheck_result: Some(vec![
                FactCheckItem {
                    statement: "A".into(),
                    correctness: "factual".into(),
                    explanation: String::new(),
                    citations: vec![],
                },
                FactCheckItem {
                    statement: "B".into(),
                    correctness: "misleading".into(),
                    explanation: String::new(),
                    citations: vec![],
                },
                FactCheckItem {
                    statement: "C".into(),
                    correctness: "factual".into(),
                    explanation: String::new(),
                    citations: vec![],
                },
            ]),
            summarise_result: Some("- Parliament passed the budget".into()),
            data_summary: None,
            created_at: None,
        }
    }

    #[test]
    fn report_includes_all_sections() {
        let text = format_report(&record(), "https://newslens.example.com");
        assert!(text.contains("Budget passed"));
        assert!(text.contains("Fact check (3 statements):"));
        assert!(text.contains("factual: 2"));
        assert!(text.contains("misleading: 1"));
        assert!(text.contains("positive: 70.0%"));
        assert!(text.contains("Propaganda likelihood: 8.0%"));
        assert!(text.contains("/news/00000000-0000-0000-0000-000000000000"));
    }

    #[test]
    fn summary_paragraphs_become_bullets() {
        let mut record = record();
        record.summarise_result = Some(
            "First key point.\n\nSecond key point.\n- Third, already bulleted.".into(),
        );
        let text = format_report(&record, "https://newslens.example.com");
        assert!(text.contains("• First key point.\n"));
        assert!(text.contains("• Second key point.\n"));
        assert!(text.contains("• Third, already bulleted.\n"));
        assert!(!text.contains("• - "));
    }

    #[test]
    fn sentiment_is_sorted_descending() {
        let text = format_report(&record(), "https://newslens.example.com");
        let pos = text.find("positive").unwrap();
        let neu = text.find("neutral:").unwrap();
        let neg = text.find("negative").unwrap();
        assert!(pos < neu && neu < neg);
    }

    #[test]
    fn emotions_are_capped_at_five() {
        let text = format_report(&record(), "https://newslens.example.com");
        assert!(text.contains("joy"));
        assert!(!text.contains("sadness"));
    }

    #[test]
    fn partial_record_skips_missing_sections() {
        let record = NewsRecord {
            title: "Pending".into(),
            ..Default::default()
        };
        let text = format_report(&record, "https://newslens.example.com");
        assert!(text.contains("Pending"));
        assert!(!text.contains("Summary:"));
        assert!(!text.contains("Fact check"));
        assert!(!text.contains("Sentiment:"));
    }
}
