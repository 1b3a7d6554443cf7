//! Keyword fingerprints.
//!
//! A document's topic is represented by a short ordered list of normalized
//! tokens. Everything that produces tokens (generator output, legacy files)
//! funnels through [`Keyword::parse`], so a [`KeywordSet`] only ever holds
//! lowercase tokens of at least two characters.

pub mod decode;
pub mod extractor;
pub mod store;

pub use decode::{decode_keywords, parse_json_payload, scan_bracketed_list};
pub use extractor::{ExtractorSettings, KeywordExtractor};
pub use store::{KeywordStore, StoredKeywords};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Hard cap on the number of keywords kept per text.
pub const MAX_KEYWORDS: usize = 32;

/// Characters stripped from both ends of a raw token.
const WRAPPING_CHARS: &[char] = &['"', '\'', '`', '[', ']', '{', '}', '(', ')'];

/// A single normalized keyword.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Keyword(String);

impl Keyword {
    /// Normalize a raw token.
    ///
    /// Trims whitespace and wrapping quote/bracket characters, lowercases,
    /// and rejects anything shorter than two characters.
    pub fn parse(raw: &str) -> Option<Self> {
        let cleaned = raw
            .trim()
            .trim_matches(WRAPPING_CHARS)
            .trim()
            .to_lowercase();

        if cleaned.chars().count() < 2 {
            return None;
        }

        Some(Keyword(cleaned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Keyword {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Keyword::parse(&value).ok_or_else(|| format!("invalid keyword: {:?}", value))
    }
}

impl From<Keyword> for String {
    fn from(keyword: Keyword) -> Self {
        keyword.0
    }
}

/// Ordered, capped list of keywords describing one text.
///
/// Order is the order the generator produced; duplicates are kept as-is
/// since scoring works on distinct tokens anyway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeywordSet(Vec<Keyword>);

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize raw tokens, drop invalid ones, keep at most [`MAX_KEYWORDS`].
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        KeywordSet(
            tokens
                .into_iter()
                .filter_map(|t| Keyword::parse(t.as_ref()))
                .take(MAX_KEYWORDS)
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.0.iter()
    }

    /// Distinct tokens, for set arithmetic.
    pub fn distinct(&self) -> HashSet<&str> {
        self.0.iter().map(Keyword::as_str).collect()
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|k| k.0.clone()).collect()
    }
}

impl fmt::Display for KeywordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.0.iter().map(Keyword::as_str).collect();
        f.write_str(&joined.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_normalization() {
        assert_eq!(Keyword::parse("  Deploy ").unwrap().as_str(), "deploy");
        assert_eq!(Keyword::parse("\"Setup\"").unwrap().as_str(), "setup");
        assert_eq!(Keyword::parse("['config'").unwrap().as_str(), "config");
        assert_eq!(Keyword::parse("(Load Balancing)").unwrap().as_str(), "load balancing");
        assert_eq!(Keyword::parse("` api `").unwrap().as_str(), "api");
    }

    #[test]
    fn test_keyword_rejects_short_tokens() {
        assert!(Keyword::parse("").is_none());
        assert!(Keyword::parse("   ").is_none());
        assert!(Keyword::parse("x").is_none());
        assert!(Keyword::parse("\"a\"").is_none());
        assert!(Keyword::parse("[]").is_none());
    }

    #[test]
    fn test_keyword_counts_characters_not_bytes() {
        // one char, two bytes
        assert!(Keyword::parse("é").is_none());
        assert_eq!(Keyword::parse("Ün").unwrap().as_str(), "ün");
    }

    #[test]
    fn test_keyword_set_caps_and_preserves_order() {
        let tokens: Vec<String> = (0..50).map(|i| format!("Token{:02}", i)).collect();
        let set = KeywordSet::from_tokens(&tokens);

        assert_eq!(set.len(), MAX_KEYWORDS);
        assert_eq!(set.to_strings()[0], "token00");
        assert_eq!(set.to_strings()[31], "token31");
    }

    #[test]
    fn test_keyword_set_cap_applies_after_filtering() {
        let mut tokens = vec!["x".to_string(); 10];
        tokens.extend((0..40).map(|i| format!("kw{}", i)));
        let set = KeywordSet::from_tokens(tokens);
        assert_eq!(set.len(), MAX_KEYWORDS);
        assert_eq!(set.to_strings()[0], "kw0");
    }

    #[test]
    fn test_distinct_collapses_duplicates() {
        let set = KeywordSet::from_tokens(["setup", "Setup", "deploy"]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.distinct().len(), 2);
    }

    #[test]
    fn test_serializes_as_bare_list() {
        let set = KeywordSet::from_tokens(["Setup", "deploy"]);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["setup","deploy"]"#);
    }

    #[test]
    fn test_keyword_deserialization_validates() {
        let ok: Keyword = serde_json::from_str("\"Billing\"").unwrap();
        assert_eq!(ok.as_str(), "billing");
        assert!(serde_json::from_str::<Keyword>("\"b\"").is_err());
    }
}
