//! Word-window chunking for long articles. The inference API truncates long
//! inputs at the model's token limit, so articles are split into windows and
//! the per-window scores aggregated with the window length as weight.

pub const MAX_CHUNK_WORDS: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub text: String,
    pub words: usize,
}

/// Split text into consecutive windows of at most `max_words` whitespace-
/// separated words. Empty input yields no chunks.
pub fn chunk_words(text: &str, max_words: usize) -> Vec<Chunk> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(max_words)
        .map(|w| Chunk {
            text: w.join(" "),
            words: w.len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = chunk_words("one two three", 500);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "one two three");
        assert_eq!(chunks[0].words, 3);
    }

    #[test]
    fn long_text_splits_with_remainder() {
        let text = (0..1100).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        let chunks = chunk_words(&text, 500);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].words, 500);
        assert_eq!(chunks[1].words, 500);
        assert_eq!(chunks[2].words, 100);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_words("", 500).is_empty());
        assert!(chunk_words("   \n  ", 500).is_empty());
    }
}
