//! Response parsing
//!
//! Model completions are supposed to be a single JSON object. In practice
//! they arrive wrapped in code fences, cut off at the token limit, or with a
//! stray character in the middle. Each public function here strips fences,
//! tries a plain parse, and then falls back to a [`RecoveryPolicy`].
//!
//! | Function | Output | Recovery |
//! |----------|--------|----------|
//! | [`parse_candidate`] | [`SongCandidate`] | field extraction, brace balancing |
//! | [`parse_evaluation_bundle`] | [`EvaluationBundle`] | brace balancing |
//! | [`parse_artist_options`] | up to 3 [`ArtistProfile`]s | none |

mod fence;
mod recovery;

pub use fence::strip_code_fences;
pub use recovery::{
    BraceBalancing, EVALUATIONS_MARKER, FieldExtraction, RecoveryPolicy, RecoveryStrategy,
    balance_brackets,
};

use crate::artist::ArtistProfile;
use crate::core::string::head;
use crate::evaluation::EvaluationBundle;
use crate::song::{SongCandidate, UNTITLED};
use serde_json::Value;
use thiserror::Error;

/// Characters of raw text kept in a [`ParseError`].
pub const ERROR_PREVIEW_CHARS: usize = 200;

/// Most artist options returned by one generation call.
pub const MAX_ARTIST_OPTIONS: usize = 3;

/// A completion that could not be turned into the expected shape
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (response starts with: {preview:?})")]
pub struct ParseError {
    /// The first parse failure
    pub message: String,
    /// First characters of the raw completion
    pub preview: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>, raw: &str) -> Self {
        Self {
            message: message.into(),
            preview: head(raw, ERROR_PREVIEW_CHARS).to_string(),
        }
    }
}

/// Parse a song generation completion.
///
/// Missing fields default (`name` to "Untitled", the others to empty); the
/// caller decides whether the result is complete enough to keep.
pub fn parse_candidate(raw: &str) -> Result<SongCandidate, ParseError> {
    parse_with(raw, &RecoveryPolicy::for_candidates(), candidate_from_value, Ok)
}

/// Parse an orchestrator completion.
pub fn parse_evaluation_bundle(raw: &str) -> Result<EvaluationBundle, ParseError> {
    parse_with(
        raw,
        &RecoveryPolicy::for_evaluations(),
        |value| value,
        EvaluationBundle::from_value,
    )
}

/// Parse an artist generation completion.
///
/// Accepts `{"artists": [...]}` or a bare array; entries without a name are
/// skipped.
pub fn parse_artist_options(raw: &str) -> Result<Vec<ArtistProfile>, ParseError> {
    parse_with(raw, &RecoveryPolicy::<Value>::new(), |value| value, |value| {
        let entries = match value {
            Value::Array(entries) => entries,
            Value::Object(mut root) => match root.remove("artists") {
                Some(Value::Array(entries)) => entries,
                _ => return Err("response has no `artists` array".to_string()),
            },
            _ => return Err("response is neither an object nor an array".to_string()),
        };

        Ok(entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value::<ArtistProfile>(entry).ok())
            .filter(|artist| !artist.name.trim().is_empty())
            .take(MAX_ARTIST_OPTIONS)
            .collect())
    })
}

fn parse_with<R, T>(
    raw: &str,
    policy: &RecoveryPolicy<R>,
    lift: impl FnOnce(Value) -> R,
    convert: impl FnOnce(R) -> Result<T, String>,
) -> Result<T, ParseError> {
    let text = strip_code_fences(raw);
    let parsed = match serde_json::from_str::<Value>(text) {
        Ok(value) => lift(value),
        Err(err) => match policy.recover(text) {
            Some((value, _strategy)) => value,
            None => return Err(ParseError::new(err.to_string(), raw)),
        },
    };
    convert(parsed).map_err(|message| ParseError::new(message, raw))
}

/// Map a parsed object onto a candidate, defaulting absent fields.
pub(crate) fn candidate_from_value(value: Value) -> SongCandidate {
    let field = |key: &str| value.get(key).filter(|v| !v.is_null()).map(text_of);
    let name = field("name").unwrap_or_else(|| UNTITLED.to_string());
    let style = field("style")
        .or_else(|| field("style_description"))
        .unwrap_or_default();
    let lyrics = field("lyrics").unwrap_or_default();
    SongCandidate::new(name, style, lyrics)
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
