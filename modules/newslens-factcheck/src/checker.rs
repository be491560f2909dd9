//! LLM-backed fact-checking: statement extraction and summarisation run on
//! DeepSeek (Groq-hosted), per-statement verification runs on Perplexity
//! Sonar for its web citations.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use llm_client::{extract_json_payload, ChatClient, ChatMessage, ChatRequest};
use newslens_common::{error::Result, FactCheckFinding, NewsLensError};

pub const DEEPSEEK_MODEL: &str = "deepseek-r1-distill-llama-70b";
pub const SONAR_MODEL: &str = "sonar-pro";

#[derive(Debug, Serialize, Deserialize)]
struct StatementItem {
    statement: String,
}

#[derive(Debug, Deserialize)]
struct Verdict {
    statement: String,
    #[serde(default)]
    accuracy: String,
    #[serde(default)]
    explanation: String,
}

/// Parse the cleaned statement-extraction output into plain statements.
pub fn parse_statements(raw: &str) -> Result<Vec<String>> {
    let payload = extract_json_payload(raw);
    let items: Vec<StatementItem> = serde_json::from_str(&payload)
        .map_err(|e| NewsLensError::Llm(format!("Unparseable statement list: {e}")))?;
    Ok(items.into_iter().map(|i| i.statement).collect())
}

/// Parse one verification response, attaching the API's citations.
pub fn parse_finding(raw: &str, citations: Vec<String>) -> Result<FactCheckFinding> {
    let payload = extract_json_payload(raw);
    let verdict: Verdict = serde_json::from_str(&payload)
        .map_err(|e| NewsLensError::Llm(format!("Unparseable verdict: {e}")))?;
    Ok(FactCheckFinding {
        statement: verdict.statement,
        accuracy: verdict.accuracy,
        explanation: verdict.explanation,
        citations,
    })
}

pub struct FactChecker {
    deepseek: ChatClient,
    sonar: ChatClient,
}

impl FactChecker {
    pub fn new(deepseek: ChatClient, sonar: ChatClient) -> Self {
        Self { deepseek, sonar }
    }

    /// Pull out the claims in an article that are worth verifying.
    pub async fn extract_statements(&self, content: &str) -> Result<Vec<String>> {
        let request = ChatRequest::new(
            DEEPSEEK_MODEL,
            vec![
                ChatMessage::system(
                    "You are a content auditor and will only assist with tasks related to \
                     this. Your role is to analyze articles and identify statements that may \
                     be factually incorrect or require further investigation.",
                ),
                ChatMessage::user(format!(
                    "The article content to audit is: {content}. Please output a JSON array \
                     of objects, each containing the following field: statement. Besides the \
                     specified format, do not mention anything else."
                )),
            ],
        )
        .temperature(0.0);

        let response = self
            .deepseek
            .complete(&request)
            .await
            .map_err(|e| NewsLensError::Llm(e.to_string()))?;

        let statements = parse_statements(&response)?;
        info!(count = statements.len(), "Extracted statements for fact-checking");
        Ok(statements)
    }

    /// Verify each statement independently. Failed statements are logged and
    /// skipped so one bad completion doesn't sink the whole article.
    pub async fn fact_check(
        &self,
        statements: &[String],
        article_title: &str,
    ) -> Result<Vec<FactCheckFinding>> {
        let mut findings = Vec::new();

        for statement in statements {
            let request = ChatRequest::new(
                SONAR_MODEL,
                vec![
                    ChatMessage::system(format!(
                        "You are a fact-checker and will only assist with fact-checking tasks \
                         in Singapore for popular media outlets straitstimes and channel news \
                         asia (CNA). You are to analyse if statements provided are \
                         factual/unfactual/cannot be determined. Utilise citations relevant to \
                         Singapore to derive this. Provide an explanation with reference to \
                         quotes from the cited sources for your answer but do not use the \
                         original article titled: {article_title} in your citations."
                    )),
                    ChatMessage::user(format!(
                        "The statement to fact-check is: {statement}. Please output a JSON \
                         object containing the following fields: statement, accuracy \
                         (factual/unfactual/cannot be determined), and explanation. Besides \
                         the specified format, do not mention anything else."
                    )),
                ],
            );

            match self.sonar.chat(&request).await {
                Ok(response) => {
                    let content = response.content().unwrap_or_default().to_string();
                    match parse_finding(&content, response.citations) {
                        Ok(finding) => findings.push(finding),
                        Err(e) => {
                            warn!(statement = %statement, error = %e, "Skipping unparseable verdict")
                        }
                    }
                }
                Err(e) => warn!(statement = %statement, error = %e, "Fact-check call failed"),
            }
        }

        info!(
            checked = findings.len(),
            total = statements.len(),
            "Fact-check pass complete"
        );
        Ok(findings)
    }

    /// Plain-language article summary.
    pub async fn summarise(&self, content: &str) -> Result<String> {
        let request = ChatRequest::new(
            DEEPSEEK_MODEL,
            vec![
                ChatMessage::system(
                    "You are a summariser and will only assist with tasks related to \
                     summarising. You are to take inputs and summarise the contents and \
                     return the result.",
                ),
                ChatMessage::user(format!("Summarise the following content: {content}")),
            ],
        );

        self.deepseek
            .complete(&request)
            .await
            .map_err(|e| NewsLensError::Llm(e.to_string()))
    }

    /// Holistic summary of the accumulated analysis results, returned as
    /// `{sentiment_summary, emotion_summary, propaganda_summary}`.
    pub async fn summarise_model_data(
        &self,
        data: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let request = ChatRequest::new(
            DEEPSEEK_MODEL,
            vec![
                ChatMessage::system(
                    "You are an expert at summarising information and drawing inferences from \
                     a set of data. You will perform such a summary only and nothing else. \
                     Your role is to take a look at JSON data and draw inferences from the \
                     data so that a reader can easily interpret all the data holistically \
                     and not in silo.",
                ),
                ChatMessage::user(format!("The data is: {data}")),
                ChatMessage::user(
                    "Please output a JSON object containing the following fields: \
                     sentiment_summary, emotion_summary, propaganda_summary. These summaries \
                     should be short paragraphs describing the data in layman terms to guide \
                     readers through understanding one data point then leading them to the \
                     next. Make use of summarise_result to understand what the data is about. \
                     Besides the specified format, do not mention anything else.",
                ),
            ],
        );

        let response = self
            .deepseek
            .complete(&request)
            .await
            .map_err(|e| NewsLensError::Llm(e.to_string()))?;

        serde_json::from_str(&extract_json_payload(&response))
            .map_err(|e| NewsLensError::Llm(format!("Unparseable data summary: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_statement_list_with_reasoning_and_fences() {
        let raw = "<think>figuring out claims</think>```json\n\
                   [{\"statement\":\"GDP grew 4%\"},{\"statement\":\"Rain fell all week\"}]\n```";
        let statements = parse_statements(raw).unwrap();
        assert_eq!(statements, vec!["GDP grew 4%", "Rain fell all week"]);
    }

    #[test]
    fn rejects_non_json_statement_output() {
        assert!(parse_statements("I could not find any statements.").is_err());
    }

    #[test]
    fn parses_verdict_and_attaches_citations() {
        let raw = "```json\n{\"statement\":\"GDP grew 4%\",\"accuracy\":\"Factual\",\
                   \"explanation\":\"Matches official figures.\"}\n```";
        let finding =
            parse_finding(raw, vec!["https://www.singstat.gov.sg".to_string()]).unwrap();
        assert_eq!(finding.statement, "GDP grew 4%");
        assert_eq!(finding.accuracy, "Factual");
        assert_eq!(finding.citations.len(), 1);
    }

    #[test]
    fn verdict_tolerates_missing_optional_fields() {
        let finding = parse_finding("{\"statement\":\"x\"}", vec![]).unwrap();
        assert!(finding.accuracy.is_empty());
        assert!(finding.explanation.is_empty());
    }
}
