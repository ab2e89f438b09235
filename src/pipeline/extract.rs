//! JSON recovery from raw model output
//!
//! Strategies are tried from most to least trustworthy; the first one that
//! yields valid JSON wins.

use serde_json::Value;

use crate::error::{FurnishError, Result};

const FENCE: &str = "```";

/// Which recovery strategy produced the JSON value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The whole text was valid JSON
    WholeText,
    /// JSON inside a triple-backtick block, optionally tagged `json`
    FencedBlock,
    /// Span from the first `{` to the last `}`
    BraceSpan,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WholeText => "whole-text",
            Self::FencedBlock => "fenced-block",
            Self::BraceSpan => "brace-span",
        }
    }
}

/// Recover a JSON value from raw model output.
pub fn extract(raw: &str) -> Result<Value> {
    extract_with_strategy(raw).map(|(value, _)| value)
}

/// Recover a JSON value and report which strategy succeeded.
pub fn extract_with_strategy(raw: &str) -> Result<(Value, Strategy)> {
    let attempts: [(Strategy, fn(&str) -> Option<&str>); 3] = [
        (Strategy::WholeText, whole_text),
        (Strategy::FencedBlock, fenced_block),
        (Strategy::BraceSpan, brace_span),
    ];

    for (strategy, candidate) in attempts {
        let Some(text) = candidate(raw) else {
            continue;
        };
        if let Ok(value) = serde_json::from_str::<Value>(text) {
            tracing::debug!(strategy = strategy.as_str(), "recovered JSON from model output");
            return Ok((value, strategy));
        }
    }

    tracing::warn!(len = raw.len(), "no JSON could be recovered from model output");
    Err(FurnishError::unparsable(raw))
}

fn whole_text(raw: &str) -> Option<&str> {
    Some(raw)
}

/// Body of the first fenced block, without an optional `json` tag.
fn fenced_block(raw: &str) -> Option<&str> {
    let start = raw.find(FENCE)? + FENCE.len();
    let after = &raw[start..];
    let end = after.find(FENCE)?;
    let body = &after[..end];

    let body = match body.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &body[4..],
        _ => body,
    };
    Some(body.trim())
}

/// Greedy span from the first `{` through the last `}`.
// Not bracket-balanced: braces in surrounding prose widen the capture.
fn brace_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_whole_text_wins() {
        let (value, strategy) = extract_with_strategy(" {\"a\": 1}\n").unwrap();
        assert_eq!(value, json!({"a": 1}));
        assert_eq!(strategy, Strategy::WholeText);
    }

    #[test]
    fn test_fenced_block_preferred_over_brace_span() {
        let raw = "prefix ```json {\"a\":1} ``` suffix";
        let (value, strategy) = extract_with_strategy(raw).unwrap();
        assert_eq!(value, json!({"a": 1}));
        assert_eq!(strategy, Strategy::FencedBlock);
    }

    #[test_case("```\n{\"a\": 2}\n```" ; "untagged")]
    #[test_case("Here you go:\n```JSON\n{\"a\": 2}\n```\nEnjoy!" ; "uppercase tag")]
    #[test_case("```json\n{\"a\": 2}\n``` and later ```json\n{\"a\": 3}\n```" ; "first block only")]
    fn test_fenced_variants(raw: &str) {
        let (value, strategy) = extract_with_strategy(raw).unwrap();
        assert_eq!(value, json!({"a": 2}));
        assert_eq!(strategy, Strategy::FencedBlock);
    }

    #[test]
    fn test_brace_span_from_prose() {
        let raw = "Sure! The layout is {\"objects\": []} as requested.";
        let (value, strategy) = extract_with_strategy(raw).unwrap();
        assert_eq!(value, json!({"objects": []}));
        assert_eq!(strategy, Strategy::BraceSpan);
    }

    #[test]
    fn test_unterminated_fence_falls_through_to_braces() {
        let raw = "```json\n{\"a\": 4}";
        let (value, strategy) = extract_with_strategy(raw).unwrap();
        assert_eq!(value, json!({"a": 4}));
        assert_eq!(strategy, Strategy::BraceSpan);
    }

    #[test]
    fn test_brace_span_is_greedy() {
        // A stray brace after the JSON widens the capture and breaks parsing.
        let raw = "Layout: {\"a\": 1} (see {note})";
        let err = extract(raw).unwrap_err();
        assert!(matches!(err, FurnishError::UnparsableOutput { .. }));
    }

    #[test_case("" ; "empty")]
    #[test_case("I cannot produce a layout for that room." ; "plain prose")]
    #[test_case("} backwards {" ; "reversed braces")]
    #[test_case("```json\nnot json\n```" ; "bad fenced body")]
    fn test_hard_failure(raw: &str) {
        match extract(raw) {
            Err(FurnishError::UnparsableOutput { excerpt }) => {
                assert!(!excerpt.is_empty());
                assert!(excerpt.chars().count() <= crate::error::EXCERPT_MAX_CHARS + 3);
            }
            other => panic!("expected UnparsableOutput, got {other:?}"),
        }
    }

    #[test]
    fn test_failure_excerpt_is_bounded_for_long_input() {
        let raw = "no json here ".repeat(1_000);
        let Err(FurnishError::UnparsableOutput { excerpt }) = extract(&raw) else {
            panic!("expected failure");
        };
        assert!(excerpt.len() < raw.len());
        assert!(excerpt.starts_with("no json here"));
    }
}
