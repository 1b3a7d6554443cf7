//! Decoding keyword lists out of free-form generator output.
//!
//! Two stages, tried in order:
//! 1. [`parse_json_payload`]: the outermost `{...}` slice as `{"keywords": [...]}`
//! 2. [`scan_bracketed_list`]: the outermost `[...]` slice split on commas
//!
//! Both yield raw tokens; normalization happens in [`KeywordSet::from_tokens`].

use super::KeywordSet;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct KeywordPayload {
    keywords: Vec<Value>,
}

/// Slice from the first `{` to the last `}`, inclusive.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Strict stage: parse the embedded JSON object and return its `keywords`.
///
/// Returns `None` when there is no object, it fails to parse, or it has no
/// `keywords` array. String and numeric entries are kept; anything else is
/// dropped.
pub fn parse_json_payload(raw: &str) -> Option<Vec<String>> {
    let slice = extract_json_object(raw)?;
    let payload: KeywordPayload = serde_json::from_str(slice).ok()?;

    Some(
        payload
            .keywords
            .into_iter()
            .filter_map(|value| match value {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
    )
}

/// Permissive stage: split the outermost bracketed list on commas.
///
/// Tokens keep their quotes and whitespace; the caller normalizes.
pub fn scan_bracketed_list(raw: &str) -> Option<Vec<String>> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end <= start {
        return None;
    }

    Some(
        raw[start + 1..end]
            .split(',')
            .map(str::to_string)
            .collect(),
    )
}

/// Run both stages and normalize whatever comes out.
pub fn decode_keywords(raw: &str) -> KeywordSet {
    let tokens = match parse_json_payload(raw) {
        Some(tokens) => tokens,
        None => {
            tracing::debug!("Generator output is not a keyword object, scanning for a list");
            scan_bracketed_list(raw).unwrap_or_default()
        }
    };

    KeywordSet::from_tokens(tokens)
}
