//! Keyword overlap scoring and best-document selection.
//!
//! A document's score against a query is the share of the query's distinct
//! keywords that also appear in the document's set:
//!
//! ```text
//! matches = |distinct(query) ∩ distinct(document)|
//! ratio   = matches / |distinct(query)|        (0 for an empty query)
//! ```
//!
//! A document qualifies only above both floors of the [`MatchPolicy`]; among
//! qualifying documents the strictly highest ratio wins and ties keep the
//! first document seen.

use crate::keywords::{KeywordSet, KeywordStore};
use docmatch_core::{AppResult, RetrievalConfig};
use serde::Serialize;

/// Floors a candidate must clear to be selected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPolicy {
    pub min_matches: usize,
    pub min_ratio: f64,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            min_matches: 1,
            min_ratio: 0.1,
        }
    }
}

impl From<&RetrievalConfig> for MatchPolicy {
    fn from(config: &RetrievalConfig) -> Self {
        Self {
            min_matches: config.min_matches,
            min_ratio: config.min_ratio,
        }
    }
}

impl MatchPolicy {
    /// Whether a score clears both floors.
    ///
    /// Zero shared keywords never qualifies, whatever `min_matches` says.
    pub fn qualifies(&self, score: &MatchScore) -> bool {
        score.matches >= self.min_matches.max(1) && score.ratio >= self.min_ratio
    }
}

/// Overlap between a query and one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchScore {
    pub matches: usize,
    pub ratio: f64,
}

/// The selected document and how it scored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOutcome {
    pub document: String,
    pub score: MatchScore,
}

/// Score one candidate against the query.
pub fn score(query: &KeywordSet, candidate: &KeywordSet) -> MatchScore {
    let query_tokens = query.distinct();
    if query_tokens.is_empty() {
        return MatchScore {
            matches: 0,
            ratio: 0.0,
        };
    }

    let candidate_tokens = candidate.distinct();
    let matches = query_tokens.intersection(&candidate_tokens).count();

    MatchScore {
        matches,
        ratio: matches as f64 / query_tokens.len() as f64,
    }
}

/// Pick the best qualifying candidate, in iteration order for ties.
pub fn select_best<I>(query: &KeywordSet, candidates: I, policy: &MatchPolicy) -> Option<MatchOutcome>
where
    I: IntoIterator<Item = (String, KeywordSet)>,
{
    let mut best: Option<MatchOutcome> = None;

    for (document, keywords) in candidates {
        if keywords.is_empty() {
            continue;
        }

        let score = score(query, &keywords);
        tracing::debug!(
            document = %document,
            matches = score.matches,
            ratio = score.ratio,
            "Scored candidate"
        );

        if !policy.qualifies(&score) {
            continue;
        }

        let better = best
            .as_ref()
            .map_or(true, |current| score.ratio > current.score.ratio);
        if better {
            best = Some(MatchOutcome { document, score });
        }
    }

    best
}

/// Load each candidate's keyword set and select the best match.
pub fn find_best_match(
    query: &KeywordSet,
    candidates: &[String],
    store: &KeywordStore,
    policy: &MatchPolicy,
) -> AppResult<Option<MatchOutcome>> {
    let mut loaded = Vec::with_capacity(candidates.len());
    for name in candidates {
        loaded.push((name.clone(), store.load(name)?));
    }

    let outcome = select_best(query, loaded, policy);
    match &outcome {
        Some(found) => tracing::info!(
            "Best match: '{}' ({} shared keywords, ratio {:.2})",
            found.document,
            found.score.matches,
            found.score.ratio
        ),
        None => tracing::info!(
            "No document matched among {} candidates",
            candidates.len()
        ),
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn set(tokens: &[&str]) -> KeywordSet {
        KeywordSet::from_tokens(tokens)
    }

    fn candidate(name: &str, tokens: &[&str]) -> (String, KeywordSet) {
        (name.to_string(), set(tokens))
    }

    #[test]
    fn test_score_definition() {
        let query = set(&["setup", "config", "deploy"]);
        let candidate = set(&["setup", "config", "install", "cli"]);

        let s = score(&query, &candidate);
        assert_eq!(s.matches, 2);
        assert!((s.ratio - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_uses_distinct_tokens() {
        let query = set(&["setup", "setup", "deploy"]);
        let candidate = set(&["setup", "setup"]);

        let s = score(&query, &candidate);
        assert_eq!(s.matches, 1);
        assert!((s.ratio - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_query_scores_zero() {
        let s = score(&KeywordSet::new(), &set(&["setup"]));
        assert_eq!(s, MatchScore { matches: 0, ratio: 0.0 });
    }

    #[test]
    fn test_install_faq_scenario() {
        let query = set(&["setup", "config", "deploy"]);
        let docs = vec![
            candidate("faq", &["pricing", "billing"]),
            candidate("install", &["setup", "config", "install", "cli"]),
        ];

        let outcome = select_best(&query, docs, &MatchPolicy::default()).unwrap();
        assert_eq!(outcome.document, "install");
        assert_eq!(outcome.score.matches, 2);
    }

    #[test]
    fn test_unrelated_query_matches_nothing() {
        let query = set(&["xyz"]);
        let docs = vec![
            candidate("faq", &["pricing", "billing"]),
            candidate("install", &["setup", "config", "install", "cli"]),
        ];

        assert!(select_best(&query, docs, &MatchPolicy::default()).is_none());
    }

    #[test]
    fn test_floor_is_never_crossed() {
        // 1 of 11 query keywords shared: ratio ~0.09 < 0.1
        let query: Vec<String> = (0..11).map(|i| format!("topic{}", i)).collect();
        let query = KeywordSet::from_tokens(&query);
        let docs = vec![("wide".to_string(), set(&["topic0", "other"]))];
        assert!(select_best(&query, docs, &MatchPolicy::default()).is_none());

        // min_matches of 0 must not admit zero-overlap candidates
        let lax = MatchPolicy {
            min_matches: 0,
            min_ratio: 0.0,
        };
        let docs = vec![candidate("faq", &["pricing"])];
        assert!(select_best(&set(&["deploy"]), docs, &lax).is_none());
    }

    #[test]
    fn test_ratio_threshold_is_inclusive() {
        let query: Vec<String> = (0..10).map(|i| format!("topic{}", i)).collect();
        let query = KeywordSet::from_tokens(&query);
        let docs = vec![("edge".to_string(), set(&["topic3"]))];

        let outcome = select_best(&query, docs, &MatchPolicy::default()).unwrap();
        assert_eq!(outcome.document, "edge");
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        let query = set(&["setup", "deploy"]);
        let docs = vec![
            candidate("alpha", &["setup", "alpha"]),
            candidate("beta", &["setup", "beta"]),
            candidate("gamma", &["deploy", "setup"]),
        ];

        let outcome = select_best(&query, docs, &MatchPolicy::default()).unwrap();
        assert_eq!(outcome.document, "gamma");

        let docs = vec![candidate("alpha", &["setup"]), candidate("beta", &["setup"])];
        let outcome = select_best(&query, docs, &MatchPolicy::default()).unwrap();
        assert_eq!(outcome.document, "alpha");
    }

    #[test]
    fn test_empty_candidates_skipped() {
        let query = set(&["setup"]);
        let docs = vec![
            ("blank".to_string(), KeywordSet::new()),
            ("install".to_string(), set(&["setup"])),
        ];
        let outcome = select_best(&query, docs, &MatchPolicy::default()).unwrap();
        assert_eq!(outcome.document, "install");
    }

    #[test]
    fn test_deterministic() {
        let query = set(&["setup", "config", "deploy"]);
        let docs = vec![
            candidate("install", &["setup", "config"]),
            candidate("ops", &["deploy", "config"]),
            candidate("faq", &["pricing"]),
        ];

        let first = select_best(&query, docs.clone(), &MatchPolicy::default());
        for _ in 0..10 {
            assert_eq!(select_best(&query, docs.clone(), &MatchPolicy::default()), first);
        }
    }

    #[test]
    fn test_policy_from_config() {
        let config = RetrievalConfig {
            min_matches: 2,
            min_ratio: 0.5,
            ..RetrievalConfig::default()
        };
        let policy = MatchPolicy::from(&config);
        assert_eq!(policy.min_matches, 2);
        assert!(!policy.qualifies(&MatchScore { matches: 1, ratio: 1.0 }));
        assert!(!policy.qualifies(&MatchScore { matches: 2, ratio: 0.4 }));
        assert!(policy.qualifies(&MatchScore { matches: 2, ratio: 0.5 }));
    }

    #[test]
    fn test_find_best_match_reads_store() {
        let temp = TempDir::new().unwrap();
        let store = KeywordStore::new(temp.path());
        store.save("install", &set(&["setup", "config"])).unwrap();
        store.save("faq", &set(&["pricing"])).unwrap();

        let names = vec!["faq".to_string(), "install".to_string(), "fresh".to_string()];
        let outcome = find_best_match(&set(&["config"]), &names, &store, &MatchPolicy::default())
            .unwrap()
            .unwrap();
        assert_eq!(outcome.document, "install");
        assert_eq!(outcome.score.ratio, 1.0);
    }
}
