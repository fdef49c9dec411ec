//! Fuzzy patient-name matching.

use unicode_normalization::UnicodeNormalization;

const ORDER_BONUS: f32 = 0.05;
const COMPLETENESS_BONUS: f32 = 0.05;
const EXTRA_TOKEN_PENALTY: f32 = 0.03;

/// Default acceptance threshold for fuzzy name matches.
pub const DEFAULT_THRESHOLD: f32 = 0.55;

/// Lowercase, strip diacritics, collapse whitespace.
pub fn normalize_name(s: &str) -> String {
    let decomposed: String = s.nfd().filter(|c| !is_combining_mark(*c)).collect();
    decomposed.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F)
}

/// Score a candidate name against a query name. `1.0` on exact
/// (normalized) match; otherwise a weighted Jaccard over whitespace
/// tokens, with bonuses for token-order agreement and query
/// completeness, and a penalty for tokens the candidate has beyond the
/// query.
pub fn fuzzy_name_score(query: &str, candidate: &str) -> f32 {
    let q = normalize_name(query);
    let c = normalize_name(candidate);
    if q == c {
        return 1.0;
    }

    let q_tokens: Vec<&str> = q.split_whitespace().collect();
    let c_tokens: Vec<&str> = c.split_whitespace().collect();
    if q_tokens.is_empty() || c_tokens.is_empty() {
        return 0.0;
    }

    let q_set: std::collections::HashSet<&str> = q_tokens.iter().copied().collect();
    let c_set: std::collections::HashSet<&str> = c_tokens.iter().copied().collect();

    let weight = |t: &str| t.chars().count() as f32;
    let intersection: Vec<&str> = q_set.intersection(&c_set).copied().collect();
    let union: std::collections::HashSet<&str> = q_set.union(&c_set).copied().collect();

    let intersection_weight: f32 = intersection.iter().map(|t| weight(t)).sum();
    let union_weight: f32 = union.iter().map(|t| weight(t)).sum();
    if union_weight == 0.0 {
        return 0.0;
    }
    let mut score = intersection_weight / union_weight;

    // Token-order agreement: do the shared tokens appear in the same
    // relative order in both names?
    let q_order: Vec<&str> = q_tokens.iter().filter(|t| c_set.contains(**t)).copied().collect();
    let c_order: Vec<&str> = c_tokens.iter().filter(|t| q_set.contains(**t)).copied().collect();
    if !q_order.is_empty() && q_order == c_order {
        score += ORDER_BONUS;
    }

    // Completeness: every query token is present in the candidate.
    if q_set.is_subset(&c_set) {
        score += COMPLETENESS_BONUS;
    }

    // Penalty for candidate tokens the query doesn't account for.
    let extra = c_set.difference(&q_set).count();
    score -= extra as f32 * EXTRA_TOKEN_PENALTY;

    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_after_normalization() {
        let score = fuzzy_name_score("Pepito Gómez", "pepito gomez");
        assert_eq!(score, 1.0);
    }

    #[test]
    fn partial_match_scores_between_zero_and_one() {
        let score = fuzzy_name_score("Pepito Gómez", "Pepito G.");
        assert!(score > 0.0 && score < 1.0);
    }

    #[test]
    fn unrelated_names_score_low() {
        let score = fuzzy_name_score("Pepito Gómez", "Maria Fernandez");
        assert!(score < DEFAULT_THRESHOLD);
    }

    #[test]
    fn extra_tokens_reduce_score() {
        let a = fuzzy_name_score("Pepito Gómez", "Pepito Gómez Martinez Lopez");
        let b = fuzzy_name_score("Pepito Gómez", "Pepito Gómez");
        assert!(a < b);
    }
}
