//! Fuzzy group search.
//!
//! Served from the backend so clients get ranked results in one round trip.
//! Scoring is two-tier: a case-insensitive substring match is a full hit,
//! otherwise the query is compared against individual words with normalized
//! Levenshtein similarity (via `strsim`) so typos like "pythn" still find
//! "Python". Description matches are discounted so name hits rank first.

use strsim::normalized_levenshtein;

use crate::store::Group;

/// A word must be at least this similar to count as a typo match.
const TYPO_THRESHOLD: f64 = 0.3;
const DESCRIPTION_WEIGHT: f64 = 0.7;

/// Score `text` against `query`, 0.0 (no match) to 1.0 (substring hit).
pub fn match_score(query: &str, text: &str) -> f64 {
    let query = query.to_lowercase();
    let text = text.to_lowercase();

    if query.is_empty() || text.is_empty() {
        return 0.0;
    }

    if text.contains(&query) {
        return 1.0;
    }

    // Only words at least as long as the query are scored.
    let query_len = query.chars().count();
    let best = text
        .split_whitespace()
        .filter(|word| word.chars().count() >= query_len)
        .map(|word| normalized_levenshtein(&query, word))
        .fold(0.0f64, f64::max);

    if best >= 1.0 - TYPO_THRESHOLD {
        best
    } else {
        0.0
    }
}

/// Rank groups by relevance, dropping non-matches. Ties keep store order.
pub fn rank(query: &str, groups: Vec<Group>) -> Vec<Group> {
    let mut scored: Vec<(Group, f64)> = groups
        .into_iter()
        .filter_map(|group| {
            let name = match_score(query, &group.name);
            let description = match_score(query, &group.description);
            let total = name.max(description * DESCRIPTION_WEIGHT);
            (total > 0.0).then_some((group, total))
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().map(|(group, _)| group).collect()
}
