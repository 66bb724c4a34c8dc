//! Final score blending and candidate ordering.

use std::cmp::Ordering;

use wellmatch_model::{PractitionerRecord, ScoringWeights, SelectionOptions};

use crate::location::LocationScore;
use crate::score::SymptomRelevance;

/// A practitioner scored against one query.
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    pub practitioner: &'a PractitionerRecord,
    pub relevance: SymptomRelevance,
    pub location: LocationScore,
    pub reputation: f64,
    /// Blended score in `[0, 1]`.
    pub final_score: f64,
}

impl ScoredCandidate<'_> {
    pub fn symptom_score(&self) -> f64 {
        self.relevance.score
    }

    /// Final score as a whole percentage.
    pub fn percent(&self) -> u8 {
        to_percent(self.final_score)
    }

    /// Human-readable breakdown of the score.
    pub fn explain(&self) -> String {
        [
            ("symptoms", self.relevance.score),
            ("location", self.location.score),
            ("reputation", self.reputation),
            ("final", self.final_score),
        ]
        .iter()
        .map(|(name, value)| format!("{name} {}%", to_percent(*value)))
        .collect::<Vec<_>>()
        .join("; ")
    }
}

pub(crate) fn to_percent(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Blends the sub-scores into a final score.
///
/// Relevance at or below the floor forces zero, so location and reputation
/// alone never recommend anyone.
pub fn final_score(
    relevance: &SymptomRelevance,
    location: &LocationScore,
    reputation: f64,
    rating: Option<f64>,
    patient_city_known: bool,
    weights: &ScoringWeights,
) -> f64 {
    if relevance.score <= weights.relevance_floor {
        return 0.0;
    }

    let symptom_weight = if relevance.has_exact() {
        weights.symptom_with_exact
    } else {
        weights.symptom
    };
    let location_weight = if patient_city_known {
        weights.location_known
    } else {
        weights.location_unknown
    };
    let reputation_weight = (1.0 - symptom_weight - location_weight).max(0.0);

    let mut score = relevance.score * symptom_weight
        + location.score * location_weight
        + reputation * reputation_weight;

    if relevance.score > weights.high_relevance {
        score *= weights.high_relevance_boost;
    }
    if location.same_city && rating.is_some_and(|r| r >= weights.local_rating) {
        score *= weights.local_boost;
    }
    score.clamp(0.0, 1.0)
}

/// Orders two candidates; `Less` means `a` ranks first.
///
/// Keys in order: more exact matches; higher final score when the gap
/// exceeds `score_noise`; more strong matches; higher coverage when the gap
/// exceeds `coverage_noise`; higher raw relevance.
///
/// The noise bands make this relation non-transitive, so it must not be
/// handed to `sort_by`. Use [`rank`].
pub fn compare_candidates(
    a: &ScoredCandidate<'_>,
    b: &ScoredCandidate<'_>,
    options: &SelectionOptions,
) -> Ordering {
    let (ra, rb) = (&a.relevance, &b.relevance);

    let exact = rb.exact.cmp(&ra.exact);
    if exact != Ordering::Equal {
        return exact;
    }
    if (a.final_score - b.final_score).abs() > options.score_noise {
        return b.final_score.total_cmp(&a.final_score);
    }
    let strong = rb.strong.cmp(&ra.strong);
    if strong != Ordering::Equal {
        return strong;
    }
    if (ra.coverage - rb.coverage).abs() > options.coverage_noise {
        return rb.coverage.total_cmp(&ra.coverage);
    }
    rb.raw.total_cmp(&ra.raw)
}

/// Stable insertion ordering by [`compare_candidates`].
///
/// Each candidate, in input order, moves ahead of the already placed ones
/// only while it strictly outranks them. Ties keep input order.
pub fn rank<'a>(
    candidates: Vec<ScoredCandidate<'a>>,
    options: &SelectionOptions,
) -> Vec<ScoredCandidate<'a>> {
    let mut ranked: Vec<ScoredCandidate<'a>> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let mut at = ranked.len();
        while at > 0 && compare_candidates(&candidate, &ranked[at - 1], options) == Ordering::Less {
            at -= 1;
        }
        ranked.insert(at, candidate);
    }
    ranked
}
