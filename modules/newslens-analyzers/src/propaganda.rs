use hf_client::HfClient;
use tracing::info;

use newslens_common::{error::Result, NewsLensError, PropagandaResponse, PropagandaResult};

use crate::aggregate::merge_spans;
use crate::chunk::{chunk_words, MAX_CHUNK_WORDS};

pub const PROPAGANDA_MODEL: &str = "QCRI/PropagandaTechniquesAnalysis-en-BERT";

/// Chunked propaganda analysis: the sequence-level propaganda probability is
/// averaged across chunks, and token-level technique spans are merged into
/// flagged passages per chunk.
pub async fn analyze_propaganda(hf: &HfClient, text: &str) -> Result<PropagandaResponse> {
    let chunks = chunk_words(text, MAX_CHUNK_WORDS);
    if chunks.is_empty() {
        return Err(NewsLensError::Validation("Empty text".to_string()));
    }

    let mut propaganda_sum = 0.0;
    let mut non_propaganda_sum = 0.0;
    let mut formatted_result = Vec::new();

    for chunk in &chunks {
        let labels = hf
            .classify(PROPAGANDA_MODEL, &chunk.text)
            .await
            .map_err(|e| NewsLensError::Inference(e.to_string()))?;
        for ls in &labels {
            if ls.label.to_lowercase().starts_with("non") {
                non_propaganda_sum += ls.score;
            } else {
                propaganda_sum += ls.score;
            }
        }

        let spans = hf
            .token_classify(PROPAGANDA_MODEL, &chunk.text)
            .await
            .map_err(|e| NewsLensError::Inference(e.to_string()))?;
        formatted_result.extend(merge_spans(&spans));
    }

    let n = chunks.len() as f64;
    info!(
        chunks = chunks.len(),
        flagged = formatted_result.len(),
        "Propaganda analysis complete"
    );

    Ok(PropagandaResponse {
        propaganda_result: PropagandaResult {
            non_propaganda_probability: non_propaganda_sum / n,
            propaganda_probability: propaganda_sum / n,
            formatted_result,
        },
    })
}
