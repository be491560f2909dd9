use hf_client::HfClient;
use tracing::info;

use newslens_common::{error::Result, NewsLensError, SentimentResponse};

use crate::aggregate::weighted_average;
use crate::chunk::{chunk_words, MAX_CHUNK_WORDS};

pub const SENTIMENT_MODEL: &str = "cardiffnlp/twitter-roberta-base-sentiment-latest";

/// Chunked sentiment classification, weighted-averaged over the article.
pub async fn analyze_sentiment(hf: &HfClient, text: &str) -> Result<SentimentResponse> {
    let chunks = chunk_words(text, MAX_CHUNK_WORDS);
    if chunks.is_empty() {
        return Err(NewsLensError::Validation("Empty text".to_string()));
    }

    let mut per_chunk = Vec::with_capacity(chunks.len());
    let mut weights = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        let scores = hf
            .classify(SENTIMENT_MODEL, &chunk.text)
            .await
            .map_err(|e| NewsLensError::Inference(e.to_string()))?;
        per_chunk.push(scores);
        weights.push(chunk.words);
    }

    info!(chunks = chunks.len(), "Sentiment analysis complete");

    Ok(SentimentResponse {
        sentiment_result: weighted_average(&per_chunk, &weights),
    })
}
