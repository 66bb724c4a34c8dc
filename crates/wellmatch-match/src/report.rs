//! Owned, serializable recommendation output.

use serde::{Deserialize, Serialize};

use crate::engine::MatchResult;
use crate::rank::{ScoredCandidate, to_percent};
use crate::score::MatchTier;
use crate::select::SelectionStrategy;

/// A matched practitioner symptom, as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedSymptom {
    pub symptom: String,
    pub query_token: String,
    pub tier: MatchTier,
}

/// One recommended practitioner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub location: Option<String>,
    pub rating: Option<f64>,
    pub matched_symptoms: Vec<MatchedSymptom>,
    pub exact_matches: usize,
    pub strong_matches: usize,
    pub partial_matches: usize,
    pub coverage: f64,
    pub symptom_score: f64,
    pub location_score: f64,
    pub reputation_score: f64,
    pub distance_km: Option<f64>,
    pub same_city: bool,
    pub final_score: f64,
    /// Final score as a whole percentage.
    pub match_percent: u8,
}

impl MatchEntry {
    pub fn from_candidate(rank: usize, candidate: &ScoredCandidate<'_>) -> Self {
        let practitioner = candidate.practitioner;
        let relevance = &candidate.relevance;
        Self {
            rank,
            id: practitioner.id().to_string(),
            name: practitioner.name().to_string(),
            specialty: practitioner.specialty().to_string(),
            location: practitioner.location().map(str::to_string),
            rating: practitioner.rating(),
            matched_symptoms: relevance
                .matches
                .iter()
                .map(|m| MatchedSymptom {
                    symptom: m.symptom.clone(),
                    query_token: m.query_token.clone(),
                    tier: m.tier,
                })
                .collect(),
            exact_matches: relevance.exact,
            strong_matches: relevance.strong,
            partial_matches: relevance.partial,
            coverage: relevance.coverage,
            symptom_score: relevance.score,
            location_score: candidate.location.score,
            reputation_score: candidate.reputation,
            distance_km: candidate.location.distance_km,
            same_city: candidate.location.same_city,
            final_score: candidate.final_score,
            match_percent: to_percent(candidate.final_score),
        }
    }

    /// Matched symptoms as `"headache (exact), migraine (exact)"`.
    pub fn matched_summary(&self) -> String {
        self.matched_symptoms
            .iter()
            .map(|m| format!("{} ({})", m.symptom, m.tier))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Complete recommendation for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub strategy: SelectionStrategy,
    pub entries: Vec<MatchEntry>,
    /// Tokens taken directly from the symptom text.
    pub extracted_tokens: Vec<String>,
    /// Tokens after synonym expansion.
    pub query_tokens: Vec<String>,
    pub considered: usize,
    pub registry_fingerprint: String,
}

impl MatchReport {
    pub fn from_result(result: &MatchResult<'_>, registry_fingerprint: impl Into<String>) -> Self {
        Self {
            strategy: result.strategy,
            entries: result
                .candidates
                .iter()
                .enumerate()
                .map(|(i, candidate)| MatchEntry::from_candidate(i + 1, candidate))
                .collect(),
            extracted_tokens: result.query.extracted().to_vec(),
            query_tokens: result.query.tokens().iter().cloned().collect(),
            considered: result.considered,
            registry_fingerprint: registry_fingerprint.into(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.strategy.is_fallback()
    }
}
