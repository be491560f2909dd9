//! Score aggregation across article chunks.

use std::collections::BTreeMap;

use hf_client::{LabelScore, TokenSpan};

/// Average label scores across chunks, weighting each chunk by its length.
/// Weights are normalised so the result stays a probability distribution
/// when the inputs are.
pub fn weighted_average(per_chunk: &[Vec<LabelScore>], weights: &[usize]) -> BTreeMap<String, f64> {
    let total: usize = weights.iter().sum();
    if total == 0 {
        return BTreeMap::new();
    }

    let mut aggregated: BTreeMap<String, f64> = BTreeMap::new();
    for (scores, weight) in per_chunk.iter().zip(weights) {
        let w = *weight as f64 / total as f64;
        for ls in scores {
            *aggregated.entry(ls.label.clone()).or_default() += ls.score * w;
        }
    }
    aggregated
}

/// Count the top-scoring label of each chunk. Returns `(label, count)` pairs
/// in descending count order (ties broken alphabetically for determinism).
pub fn majority_vote(per_chunk: &[Vec<LabelScore>]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for scores in per_chunk {
        let top = scores
            .iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .map(|ls| ls.label.clone());
        if let Some(label) = top {
            *counts.entry(label).or_default() += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// Character gap below which two same-technique spans are considered one
/// flagged passage interrupted by a few plain tokens.
pub const SPAN_GAP_TOLERANCE: usize = 24;

/// Merge adjacent token-classification spans that carry the same technique
/// tag and sit close together in the text. Untagged (`O`) spans are dropped.
pub fn merge_spans(spans: &[TokenSpan]) -> Vec<(String, String)> {
    let mut sorted: Vec<&TokenSpan> = spans.iter().filter(|s| s.entity_group != "O").collect();
    sorted.sort_by_key(|s| s.start);

    let mut merged: Vec<(String, String, usize)> = Vec::new();
    for span in sorted {
        match merged.last_mut() {
            Some((tag, text, end))
                if *tag == span.entity_group
                    && span.start.saturating_sub(*end) <= SPAN_GAP_TOLERANCE =>
            {
                text.push(' ');
                text.push_str(span.word.trim());
                *end = span.end;
            }
            _ => merged.push((
                span.entity_group.clone(),
                span.word.trim().to_string(),
                span.end,
            )),
        }
    }

    merged.into_iter().map(|(tag, text, _)| (tag, text)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ls(label: &str, score: f64) -> LabelScore {
        LabelScore {
            label: label.to_string(),
            score,
        }
    }

    fn span(tag: &str, word: &str, start: usize, end: usize) -> TokenSpan {
        TokenSpan {
            entity_group: tag.to_string(),
            score: 0.9,
            word: word.to_string(),
            start,
            end,
        }
    }

    #[test]
    fn weighted_average_respects_chunk_lengths() {
        let per_chunk = vec![
            vec![ls("positive", 1.0), ls("negative", 0.0)],
            vec![ls("positive", 0.0), ls("negative", 1.0)],
        ];
        // 3:1 weighting towards the first chunk.
        let avg = weighted_average(&per_chunk, &[300, 100]);
        assert!((avg["positive"] - 0.75).abs() < 1e-9);
        assert!((avg["negative"] - 0.25).abs() < 1e-9);
    }

    #[test]
    fn weighted_average_of_nothing_is_empty() {
        assert!(weighted_average(&[], &[]).is_empty());
    }

    #[test]
    fn majority_vote_counts_top_labels() {
        let per_chunk = vec![
            vec![ls("joy", 0.8), ls("anger", 0.2)],
            vec![ls("joy", 0.6), ls("anger", 0.4)],
            vec![ls("anger", 0.9), ls("joy", 0.1)],
        ];
        assert_eq!(
            majority_vote(&per_chunk),
            vec![("joy".to_string(), 2), ("anger".to_string(), 1)]
        );
    }

    #[test]
    fn merges_nearby_same_tag_spans() {
        let spans = vec![
            span("Loaded_Language", "stunning proposal", 10, 27),
            span("Loaded_Language", "shock revelation", 40, 56),
            span("Name_Calling", "war-battered", 200, 212),
        ];
        let merged = merge_spans(&spans);
        assert_eq!(
            merged,
            vec![
                (
                    "Loaded_Language".to_string(),
                    "stunning proposal shock revelation".to_string()
                ),
                ("Name_Calling".to_string(), "war-battered".to_string()),
            ]
        );
    }

    #[test]
    fn distant_spans_stay_separate() {
        let spans = vec![
            span("Doubt", "unclear claim", 0, 13),
            span("Doubt", "another claim", 100, 113),
        ];
        assert_eq!(merge_spans(&spans).len(), 2);
    }

    #[test]
    fn untagged_spans_are_dropped() {
        let spans = vec![span("O", "plain text", 0, 10)];
        assert!(merge_spans(&spans).is_empty());
    }
}
