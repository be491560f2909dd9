use std::sync::LazyLock;

use regex::Regex;

static THINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid regex"));

/// Remove `<think>…</think>` reasoning blocks emitted by DeepSeek-style models.
pub fn strip_think_blocks(response: &str) -> String {
    THINK_RE.replace_all(response, "").trim().to_string()
}

/// Strip markdown code fences from a response.
pub fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Clean a model response down to its JSON payload: drop reasoning blocks,
/// then code fences.
pub fn extract_json_payload(response: &str) -> String {
    strip_code_blocks(&strip_think_blocks(response)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_think_blocks() {
        let raw = "<think>chain of\nthought</think>The answer";
        assert_eq!(strip_think_blocks(raw), "The answer");
    }

    #[test]
    fn strips_multiple_think_blocks() {
        let raw = "<think>a</think>one<think>b</think> two";
        assert_eq!(strip_think_blocks(raw), "one two");
    }

    #[test]
    fn strips_code_blocks() {
        assert_eq!(strip_code_blocks("```json\n[{}]\n```"), "[{}]");
        assert_eq!(strip_code_blocks("```\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("{}"), "{}");
    }

    #[test]
    fn extracts_json_payload_through_both_layers() {
        let raw = "<think>reasoning</think>```json\n[{\"statement\":\"x\"}]\n```";
        assert_eq!(extract_json_payload(raw), "[{\"statement\":\"x\"}]");
    }
}
