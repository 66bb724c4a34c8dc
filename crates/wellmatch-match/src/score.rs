//! Tiered symptom relevance and reputation scoring.
//!
//! Each practitioner symptom is compared with every query token. For one
//! pair the first tier that fires decides the contribution:
//!
//! | Tier            | Condition                                     | Contribution            |
//! |-----------------|-----------------------------------------------|-------------------------|
//! | `Exact`         | strings are equal                             | 1.0                     |
//! | `WordBoundary`  | one occurs in the other as a whole word       | 0.9                     |
//! | `Forward`       | query token (≥ 4 chars) is inside the symptom | 0.7 × len(q) / len(s)   |
//! | `Reverse`       | symptom (≥ 4 chars) is inside the query token | 0.6 × len(s) / len(q)   |
//! | `Fuzzy`         | both ≥ 4 chars and similarity above 0.7       | 0.5 × similarity        |
//!
//! The symptom keeps its best contribution over all query tokens. The
//! relevance is the mean over the practitioner's symptoms, adjusted by a
//! bonus per exact match. Each exact match vouches for a few partial-tier
//! (forward, reverse, fuzzy) matches; the weakest partial matches beyond that
//! allowance keep only part of their credit. The discount never exceeds the
//! credit those matches brought in, so adding query words can only raise
//! the relevance.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use wellmatch_model::{RatingOptions, ScoringWeights, SymptomQuery, TierThresholds};

use crate::text::{char_len, contains_word, similarity};

/// How a practitioner symptom matched a query token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Fuzzy,
    Reverse,
    Forward,
    WordBoundary,
    Exact,
}

impl MatchTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::WordBoundary => "word boundary",
            Self::Forward => "forward",
            Self::Reverse => "reverse",
            Self::Fuzzy => "fuzzy",
        }
    }
}

impl MatchTier {
    /// Forward, reverse and fuzzy matches.
    pub fn is_partial(self) -> bool {
        matches!(self, Self::Forward | Self::Reverse | Self::Fuzzy)
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best match found for one practitioner symptom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomMatch {
    pub symptom: String,
    pub query_token: String,
    pub tier: MatchTier,
    pub contribution: f64,
}

/// Symptom relevance of one practitioner for one query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SymptomRelevance {
    /// Adjusted relevance in `[0, 1]`.
    pub score: f64,
    /// Mean contribution before adjustment.
    pub raw: f64,
    pub exact: usize,
    pub strong: usize,
    pub partial: usize,
    /// Fraction of query tokens matched by at least one symptom.
    pub coverage: f64,
    pub matches: Vec<SymptomMatch>,
}

impl SymptomRelevance {
    pub fn has_exact(&self) -> bool {
        self.exact > 0
    }
}

/// Scores symptom tokens against query tokens.
#[derive(Debug, Clone)]
pub struct SymptomScorer {
    tiers: TierThresholds,
    weights: ScoringWeights,
}

impl SymptomScorer {
    pub fn new(tiers: TierThresholds, weights: ScoringWeights) -> Self {
        Self { tiers, weights }
    }

    /// Contribution of one `(query token, symptom)` pair, or `None` when no
    /// tier fires.
    pub fn match_pair(&self, query_token: &str, symptom: &str) -> Option<(MatchTier, f64)> {
        let tiers = &self.tiers;
        if query_token == symptom {
            return Some((MatchTier::Exact, 1.0));
        }
        if contains_word(symptom, query_token) || contains_word(query_token, symptom) {
            return Some((MatchTier::WordBoundary, tiers.word_boundary));
        }

        let q_len = char_len(query_token);
        let s_len = char_len(symptom);
        if q_len >= tiers.substring_min_len && symptom.contains(query_token) {
            return Some((MatchTier::Forward, tiers.forward * ratio(q_len, s_len)));
        }
        if s_len >= tiers.substring_min_len && query_token.contains(symptom) {
            return Some((MatchTier::Reverse, tiers.reverse * ratio(s_len, q_len)));
        }
        if q_len >= tiers.fuzzy_min_len && s_len >= tiers.fuzzy_min_len {
            let sim = similarity(query_token, symptom);
            if sim > tiers.fuzzy_similarity {
                return Some((MatchTier::Fuzzy, tiers.fuzzy * sim));
            }
        }
        None
    }

    /// Relevance of a practitioner's symptom list for `query`.
    pub fn relevance(&self, symptoms: &[String], query: &SymptomQuery) -> SymptomRelevance {
        if symptoms.is_empty() {
            return SymptomRelevance::default();
        }

        let mut total = 0.0;
        let mut matched_tokens: BTreeSet<&str> = BTreeSet::new();
        let mut relevance = SymptomRelevance::default();

        for symptom in symptoms {
            let mut best: Option<(&str, MatchTier, f64)> = None;
            for token in query.tokens() {
                let Some((tier, contribution)) = self.match_pair(token, symptom) else {
                    continue;
                };
                matched_tokens.insert(token.as_str());
                let better = best.is_none_or(|(_, best_tier, best_value)| {
                    contribution > best_value
                        || (contribution == best_value && tier > best_tier)
                });
                if better {
                    best = Some((token.as_str(), tier, contribution));
                }
            }

            let Some((token, tier, contribution)) = best else {
                continue;
            };
            total += contribution;
            match tier {
                MatchTier::Exact => relevance.exact += 1,
                MatchTier::WordBoundary => relevance.strong += 1,
                _ => relevance.partial += 1,
            }
            relevance.matches.push(SymptomMatch {
                symptom: symptom.clone(),
                query_token: token.to_string(),
                tier,
                contribution,
            });
        }

        relevance.raw = (total / symptoms.len() as f64).clamp(0.0, 1.0);
        relevance.coverage = matched_tokens.len() as f64 / query.len().max(1) as f64;
        relevance.score = self.adjust(&relevance, symptoms.len());
        relevance
    }

    fn adjust(&self, relevance: &SymptomRelevance, symptom_count: usize) -> f64 {
        let weights = &self.weights;
        let mut score = relevance.raw + relevance.exact as f64 * weights.exact_bonus;

        let allowance = relevance.exact.saturating_mul(weights.partial_allowance);
        if relevance.partial > allowance {
            let mut partial: Vec<f64> = relevance
                .matches
                .iter()
                .filter(|m| m.tier.is_partial())
                .map(|m| m.contribution)
                .collect();
            partial.sort_by(|a, b| b.total_cmp(a));
            let excess: f64 = partial.iter().skip(allowance).sum();
            score -= weights.partial_discount * excess / symptom_count as f64;
        }
        score.clamp(0.0, 1.0)
    }
}

fn ratio(shorter: usize, longer: usize) -> f64 {
    if longer == 0 {
        0.0
    } else {
        (shorter as f64 / longer as f64).min(1.0)
    }
}

/// Reputation in `[0, 1]` from an optional rating.
pub fn reputation_score(rating: Option<f64>, options: &RatingOptions) -> f64 {
    match rating {
        Some(rating) => (rating.clamp(0.0, options.max_rating) / options.max_rating).clamp(0.0, 1.0),
        None => options.unknown_reputation.clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::QueryNormalizer;
    use wellmatch_model::SynonymTable;

    fn scorer() -> SymptomScorer {
        SymptomScorer::new(TierThresholds::default(), ScoringWeights::default())
    }

    fn plain_query(text: &str) -> SymptomQuery {
        QueryNormalizer::new(SynonymTable::empty(), &TierThresholds::default())
            .normalize(text)
            .unwrap()
    }

    fn symptoms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn tiers_fire_in_order() {
        let s = scorer();
        assert_eq!(s.match_pair("fever", "fever"), Some((MatchTier::Exact, 1.0)));
        assert_eq!(
            s.match_pair("pain", "joint pain"),
            Some((MatchTier::WordBoundary, 0.9))
        );

        let (tier, value) = s.match_pair("ache", "headache").unwrap();
        assert_eq!(tier, MatchTier::Forward);
        assert!((value - 0.35).abs() < 1e-12);

        let (tier, value) = s.match_pair("headaches", "headache").unwrap();
        assert_eq!(tier, MatchTier::Reverse);
        assert!((value - 0.6 * 8.0 / 9.0).abs() < 1e-12);

        let (tier, value) = s.match_pair("stiffness", "stifness").unwrap();
        assert_eq!(tier, MatchTier::Fuzzy);
        assert!((value - 0.5 * 8.0 / 9.0).abs() < 1e-12);

        assert_eq!(s.match_pair("joint pain", "head pain"), None);
    }

    #[test]
    fn short_tokens_skip_substring_and_fuzzy_tiers() {
        let s = scorer();
        // "hot" is inside "shot" but too short for the forward tier
        assert_eq!(s.match_pair("hot", "shot"), None);
        assert_eq!(s.match_pair("flu", "flux"), None);
    }

    #[test]
    fn exact_matches_earn_a_bonus() {
        let query = plain_query("headache migraine");
        let relevance = scorer().relevance(&symptoms(&["headache", "migraine"]), &query);
        assert_eq!(relevance.exact, 2);
        assert_eq!(relevance.raw, 1.0);
        assert_eq!(relevance.score, 1.0);
        assert_eq!(relevance.matches.len(), 2);
    }

    #[test]
    fn partial_matches_without_exact_support_are_discounted() {
        let query = plain_query("ache");
        let relevance = scorer().relevance(&symptoms(&["headache", "migraine"]), &query);
        assert_eq!(relevance.exact, 0);
        assert_eq!(relevance.partial, 1);
        assert!((relevance.raw - 0.175).abs() < 1e-12);
        // half of the forward contribution (0.35) is withheld, over two symptoms
        assert!((relevance.score - 0.0875).abs() < 1e-12);
        assert_eq!(relevance.coverage, 1.0);
    }

    #[test]
    fn exact_match_vouches_for_partial_matches() {
        let query = plain_query("fever ache");
        let relevance = scorer().relevance(&symptoms(&["fever", "headache"]), &query);
        assert_eq!(relevance.exact, 1);
        assert_eq!(relevance.partial, 1);
        assert!((relevance.score - (1.35 / 2.0 + 0.1)).abs() < 1e-12);
    }

    #[test]
    fn word_boundary_matches_are_not_discounted() {
        let mut list = vec!["rash".to_string(), "fever".to_string()];
        list.extend((0..10).map(|i| format!("fever type{i}")));
        list.extend((0..18).map(|i| format!("unrelated{i}")));

        let narrow = scorer().relevance(&list, &plain_query("rash"));
        let broad = scorer().relevance(&list, &plain_query("rash, fever"));

        assert_eq!(broad.exact, 2);
        assert_eq!(broad.strong, 10);
        assert!(broad.score >= narrow.score, "{} < {}", broad.score, narrow.score);
        assert!((broad.score - (11.0 / 30.0 + 0.2)).abs() < 1e-12);
    }

    #[test]
    fn discount_never_exceeds_partial_credit() {
        let query = plain_query("ache");
        let relevance = scorer().relevance(&symptoms(&["headache", "backache", "earache"]), &query);
        assert_eq!(relevance.partial, 3);
        assert!(relevance.score > 0.0);
        assert!(relevance.score <= relevance.raw);
    }

    #[test]
    fn counts_follow_each_symptoms_best_tier() {
        let query = plain_query("back pain");
        let relevance =
            scorer().relevance(&symptoms(&["back pain", "pain", "neck pain", "rash"]), &query);
        // "back pain" exact, "pain" exact, "neck pain" word boundary via "pain"
        assert_eq!(relevance.exact, 2);
        assert_eq!(relevance.strong, 1);
        assert_eq!(relevance.partial, 0);
    }

    #[test]
    fn coverage_counts_distinct_query_tokens() {
        let query = plain_query("fever cough rash");
        let relevance = scorer().relevance(&symptoms(&["fever"]), &query);
        // tokens: fever, cough, rash, "fever cough", "cough rash"
        assert_eq!(query.len(), 5);
        // "fever" exact and "fever cough" word boundary both touch the symptom
        assert!((relevance.coverage - 2.0 / 5.0).abs() < 1e-12);
    }

    #[test]
    fn empty_symptom_list_scores_zero() {
        let query = plain_query("fever");
        assert_eq!(scorer().relevance(&[], &query), SymptomRelevance::default());
    }

    #[test]
    fn reputation_defaults_and_clamps() {
        let options = RatingOptions::default();
        assert!((reputation_score(Some(4.8), &options) - 0.96).abs() < 1e-12);
        assert_eq!(reputation_score(Some(7.0), &options), 1.0);
        assert_eq!(reputation_score(Some(-1.0), &options), 0.0);
        assert_eq!(reputation_score(None, &options), 0.5);
    }
}
