//! Recovery strategies for malformed model output
//!
//! A [`RecoveryPolicy`] is an ordered list of strategies. Each strategy looks
//! at the fence-stripped text that failed to parse and either produces a
//! value or declines; the first strategy that produces a value wins.

use super::candidate_from_value;
use crate::song::{SongCandidate, UNTITLED};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Substring that marks an orchestrator payload.
pub const EVALUATIONS_MARKER: &str = "\"evaluations\"";

/// One way of salvaging a value from text that is not valid JSON
pub trait RecoveryStrategy<T>: Send + Sync {
    fn name(&self) -> &'static str;

    fn recover(&self, text: &str) -> Option<T>;
}

/// Ordered list of recovery strategies
pub struct RecoveryPolicy<T> {
    strategies: Vec<Box<dyn RecoveryStrategy<T>>>,
}

impl<T> Default for RecoveryPolicy<T> {
    fn default() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }
}

impl<T> RecoveryPolicy<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, strategy: impl RecoveryStrategy<T> + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run the strategies in order; returns the first recovered value and the
    /// name of the strategy that produced it.
    pub fn recover(&self, text: &str) -> Option<(T, &'static str)> {
        self.strategies
            .iter()
            .find_map(|strategy| strategy.recover(text).map(|value| (value, strategy.name())))
    }
}

impl RecoveryPolicy<SongCandidate> {
    /// Policy for song generation output.
    pub fn for_candidates() -> Self {
        Self::new().with(FieldExtraction).with(BraceBalancing)
    }
}

impl RecoveryPolicy<Value> {
    /// Policy for orchestrator output.
    pub fn for_evaluations() -> Self {
        Self::new().with(BraceBalancing)
    }
}

// ==================== Field extraction ====================

static LYRICS_FIELD: LazyLock<Regex> = LazyLock::new(|| string_field(r#""lyrics""#));
static NAME_FIELD: LazyLock<Regex> = LazyLock::new(|| string_field(r#""name""#));
static STYLE_FIELD: LazyLock<Regex> =
    LazyLock::new(|| string_field(r#""style(?:_description)?""#));

fn string_field(key: &str) -> Regex {
    Regex::new(&format!(r#"{}\s*:\s*"((?:[^"\\]|\\.)*)""#, key))
        .unwrap_or_else(|e| panic!("invalid field pattern for {}: {}", key, e))
}

/// Scan for individual `"key": "value"` pairs.
///
/// Succeeds only when a complete `lyrics` string is present; `name` and
/// `style` fall back to defaults.
pub struct FieldExtraction;

impl FieldExtraction {
    fn capture(pattern: &Regex, text: &str) -> Option<String> {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| unescape(m.as_str()))
    }
}

impl RecoveryStrategy<SongCandidate> for FieldExtraction {
    fn name(&self) -> &'static str {
        "field_extraction"
    }

    fn recover(&self, text: &str) -> Option<SongCandidate> {
        let lyrics = Self::capture(&LYRICS_FIELD, text)?;
        let name = Self::capture(&NAME_FIELD, text).unwrap_or_else(|| UNTITLED.to_string());
        let style = Self::capture(&STYLE_FIELD, text).unwrap_or_default();
        Some(SongCandidate::new(name, style, lyrics))
    }
}

/// Decode a JSON string body, falling back to the two escapes models use most.
fn unescape(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{}\"", raw))
        .unwrap_or_else(|_| raw.replace("\\n", "\n").replace("\\\"", "\""))
}

// ==================== Brace balancing ====================

/// Close the brackets left open by a truncated orchestrator payload.
///
/// Only applies to text containing `"evaluations"`.
pub struct BraceBalancing;

impl RecoveryStrategy<Value> for BraceBalancing {
    fn name(&self) -> &'static str {
        "brace_balancing"
    }

    fn recover(&self, text: &str) -> Option<Value> {
        if !text.contains(EVALUATIONS_MARKER) {
            return None;
        }
        let repaired = balance_brackets(text)?;
        serde_json::from_str(&repaired).ok()
    }
}

impl RecoveryStrategy<SongCandidate> for BraceBalancing {
    fn name(&self) -> &'static str {
        "brace_balancing"
    }

    fn recover(&self, text: &str) -> Option<SongCandidate> {
        RecoveryStrategy::<Value>::recover(self, text).map(candidate_from_value)
    }
}

/// Append the closers missing from `text`, trimming a dangling tail first.
///
/// Returns `None` when the text cannot be closed: it ends inside a string
/// literal or has a closer that does not match its opener.
pub fn balance_brackets(text: &str) -> Option<String> {
    let mut open: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for &b in text.as_bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => open.push(b'}'),
            b'[' => open.push(b']'),
            b'}' | b']' => {
                if open.pop() != Some(b) {
                    return None;
                }
            }
            _ => {}
        }
    }
    if in_string {
        return None;
    }

    let in_object = open.last() == Some(&b'}');
    let mut repaired = trim_dangling_tail(text, in_object).to_string();
    repaired.extend(open.iter().rev().map(|&b| b as char));
    Some(repaired)
}

/// Strip trailing commas, a `"key":` without a value, and a bare `"key"`.
fn trim_dangling_tail(text: &str, in_object: bool) -> &str {
    let mut tail = text.trim_end();
    loop {
        if let Some(rest) = tail.strip_suffix(',') {
            tail = rest.trim_end();
        } else if let Some(rest) = tail.strip_suffix(':') {
            match strip_trailing_string(rest.trim_end()) {
                Some(before) => tail = before.trim_end(),
                None => return tail,
            }
        } else if in_object && tail.ends_with('"') {
            match strip_trailing_string(tail) {
                Some(before) if before.trim_end().ends_with(['{', ',']) => {
                    tail = before.trim_end();
                }
                _ => return tail,
            }
        } else {
            return tail;
        }
    }
}

/// Remove a complete string literal from the end of `text`.
fn strip_trailing_string(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.last() != Some(&b'"') || bytes.len() < 2 {
        return None;
    }
    let mut i = bytes.len() - 1;
    while i > 0 {
        i -= 1;
        if bytes[i] == b'"' {
            let backslashes = bytes[..i].iter().rev().take_while(|&&b| b == b'\\').count();
            if backslashes % 2 == 0 {
                return Some(&text[..i]);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repaired_value(text: &str) -> Value {
        let repaired = balance_brackets(text).expect("closable");
        serde_json::from_str(&repaired)
            .unwrap_or_else(|e| panic!("{} did not parse: {}", repaired, e))
    }

    #[test]
    fn test_closes_zero_to_five_missing() {
        let cases = [
            (r#"{"evaluations": {"a": {"scores": {"music_style": 8}}}}"#, 0),
            (r#"{"evaluations": {"a": {"scores": {"music_style": 8}}}"#, 1),
            (r#"{"evaluations": {"a": {"scores": {"music_style": 8}}"#, 2),
            (r#"{"evaluations": {"a": {"scores": {"music_style": 8},"#, 3),
            (r#"{"evaluations": {"a": {"scores": {"music_style": 8, "lyrics": 7"#, 4),
            (
                r#"{"evaluations": {"a": {"scores": {"music_style": 8}, "recommendations": {"quick_wins": ["x""#,
                5,
            ),
        ];
        for (text, missing) in cases {
            let repaired = balance_brackets(text).expect("closable");
            assert_eq!(repaired.len() - text.trim_end_matches(',').len(), missing, "{}", text);
            assert!(serde_json::from_str::<Value>(&repaired).is_ok(), "{}", repaired);
        }
    }

    #[test]
    fn test_trims_dangling_key() {
        let value = repaired_value(r#"{"evaluations": {"a": {"analysis": "ok", "strengths""#);
        assert_eq!(value["evaluations"]["a"]["analysis"], "ok");
        assert!(value["evaluations"]["a"].get("strengths").is_none());
    }

    #[test]
    fn test_trims_key_with_colon() {
        let value = repaired_value(r#"{"evaluations": {"a": {"analysis": "ok", "strengths": "#);
        assert!(value["evaluations"]["a"].get("strengths").is_none());
    }

    #[test]
    fn test_keeps_string_values_in_arrays() {
        let value = repaired_value(r#"{"evaluations": {"a": {"strengths": ["x", "y""#);
        assert_eq!(value["evaluations"]["a"]["strengths"][1], "y");
    }

    #[test]
    fn test_keeps_complete_string_value() {
        let value = repaired_value(r#"{"evaluations": {}, "winner_reason": "best hook""#);
        assert_eq!(value["winner_reason"], "best hook");
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let value = repaired_value(r#"{"evaluations": {"a": {"analysis": "uses {brackets] and \"quotes\"""#);
        assert_eq!(
            value["evaluations"]["a"]["analysis"],
            "uses {brackets] and \"quotes\""
        );
    }

    #[test]
    fn test_truncated_inside_string_is_not_closable() {
        assert!(balance_brackets(r#"{"evaluations": {"a": {"analysis": "cut off mid"#).is_none());
    }

    #[test]
    fn test_mismatched_closer_is_not_closable() {
        assert!(balance_brackets(r#"{"evaluations": [}"#).is_none());
    }

    #[test]
    fn test_brace_balancing_requires_marker() {
        let strategy = BraceBalancing;
        assert!(RecoveryStrategy::<Value>::recover(&strategy, r#"{"scores": {"a": 1}"#).is_none());
        assert!(RecoveryStrategy::<Value>::recover(&strategy, r#"{"evaluations": {"a": {}"#).is_some());
    }

    #[test]
    fn test_field_extraction_unescapes() {
        let text = r#"{"name": "Rain \"Song\"", "style_description": "folk", "lyrics": "line one\nline two", "extra": "#;
        let candidate = FieldExtraction.recover(text).unwrap();
        assert_eq!(candidate.name, "Rain \"Song\"");
        assert_eq!(candidate.style, "folk");
        assert_eq!(candidate.lyrics, "line one\nline two");
    }

    #[test]
    fn test_field_extraction_defaults_name_and_style() {
        let candidate = FieldExtraction.recover(r#"garbage "lyrics": "la la" more"#).unwrap();
        assert_eq!(candidate.name, UNTITLED);
        assert_eq!(candidate.style, "");
        assert_eq!(candidate.lyrics, "la la");
    }

    #[test]
    fn test_field_extraction_needs_closed_lyrics() {
        assert!(FieldExtraction.recover(r#"{"name": "x", "lyrics": "unterminated"#).is_none());
    }

    #[test]
    fn test_policy_first_success_wins() {
        let policy = RecoveryPolicy::for_candidates();
        assert_eq!(policy.strategy_names(), vec!["field_extraction", "brace_balancing"]);
        let (candidate, strategy) = policy.recover(r#"{"lyrics": "x", "name": "#).unwrap();
        assert_eq!(candidate.lyrics, "x");
        assert_eq!(strategy, "field_extraction");
    }
}
