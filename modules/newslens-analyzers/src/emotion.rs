use hf_client::HfClient;
use tracing::info;

use newslens_common::{error::Result, EmotionResponse, EmotionResult, NewsLensError};

use crate::aggregate::{majority_vote, weighted_average};
use crate::chunk::{chunk_words, MAX_CHUNK_WORDS};

pub const EMOTION_MODEL: &str = "SamLowe/roberta-base-go_emotions";

/// Chunked emotion classification with hybrid aggregation: a length-weighted
/// average of all label scores plus a per-chunk top-label majority vote.
pub async fn analyze_emotion(hf: &HfClient, text: &str) -> Result<EmotionResponse> {
    let chunks = chunk_words(text, MAX_CHUNK_WORDS);
    if chunks.is_empty() {
        return Err(NewsLensError::Validation("Empty text".to_string()));
    }

    let mut per_chunk = Vec::with_capacity(chunks.len());
    let mut weights = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        let scores = hf
            .classify(EMOTION_MODEL, &chunk.text)
            .await
            .map_err(|e| NewsLensError::Inference(e.to_string()))?;
        per_chunk.push(scores);
        weights.push(chunk.words);
    }

    info!(chunks = chunks.len(), "Emotion analysis complete");

    Ok(EmotionResponse {
        emotion_result: EmotionResult {
            weighted_avg: weighted_average(&per_chunk, &weights),
            majority_vote: majority_vote(&per_chunk),
        },
    })
}
