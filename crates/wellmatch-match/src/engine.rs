//! Recommendation engine.

use wellmatch_model::{
    MatchOptions, MatchRequest, PractitionerRecord, RegistrySnapshot, SymptomQuery,
};

use crate::error::{MatchError, Result};
use crate::location::location_score;
use crate::normalize::QueryNormalizer;
use crate::rank::{ScoredCandidate, final_score, rank};
use crate::score::{SymptomScorer, reputation_score};
use crate::select::{SelectionStrategy, select};

/// Outcome of one recommendation.
#[derive(Debug, Clone)]
pub struct MatchResult<'a> {
    pub query: SymptomQuery,
    /// Selected candidates in presentation order.
    pub candidates: Vec<ScoredCandidate<'a>>,
    pub strategy: SelectionStrategy,
    /// Number of practitioners scored.
    pub considered: usize,
}

impl MatchResult<'_> {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn top(&self) -> Option<&ScoredCandidate<'_>> {
        self.candidates.first()
    }
}

/// Scores, ranks and selects practitioners for patient queries.
///
/// The engine holds only immutable calibration, so one instance can serve
/// concurrent queries against any number of snapshots.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    options: MatchOptions,
    normalizer: QueryNormalizer,
    scorer: SymptomScorer,
}

impl MatchEngine {
    /// Creates an engine after validating `options`.
    pub fn new(options: MatchOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::build(options))
    }

    fn build(options: MatchOptions) -> Self {
        let normalizer = QueryNormalizer::new(options.synonyms.clone(), &options.tiers);
        let scorer = SymptomScorer::new(options.tiers.clone(), options.weights.clone());
        Self {
            options,
            normalizer,
            scorer,
        }
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    pub fn normalize(&self, text: &str) -> Result<SymptomQuery> {
        self.normalizer.normalize(text)
    }

    /// Scores one practitioner. `patient_city` must be canonical.
    pub fn score<'a>(
        &self,
        practitioner: &'a PractitionerRecord,
        query: &SymptomQuery,
        patient_city: Option<&str>,
    ) -> ScoredCandidate<'a> {
        let relevance = self
            .scorer
            .relevance(practitioner.treatable_symptoms(), query);
        let practitioner_city = practitioner.city();
        let location = location_score(
            patient_city,
            practitioner_city.as_deref(),
            &self.options.location,
        );
        let reputation = reputation_score(practitioner.rating(), &self.options.rating);
        let final_score = final_score(
            &relevance,
            &location,
            reputation,
            practitioner.rating(),
            patient_city.is_some(),
            &self.options.weights,
        );

        tracing::debug!(
            practitioner = %practitioner.id(),
            symptom = relevance.score,
            exact = relevance.exact,
            location = location.score,
            reputation,
            final_score,
            "scored practitioner"
        );

        ScoredCandidate {
            practitioner,
            relevance,
            location,
            reputation,
            final_score,
        }
    }

    /// Recommends practitioners from `registry` for `request`.
    ///
    /// Fails with [`MatchError::EmptyQuery`] when the symptom text yields no
    /// tokens and [`MatchError::NoData`] when the registry is empty. Otherwise
    /// the result holds at least one candidate.
    pub fn recommend<'a>(
        &self,
        registry: &'a RegistrySnapshot,
        request: &MatchRequest,
    ) -> Result<MatchResult<'a>> {
        let query = self.normalize(&request.symptoms)?;
        if registry.is_empty() {
            return Err(MatchError::NoData);
        }

        let patient_city = request.city();
        let scored: Vec<ScoredCandidate<'a>> = registry
            .records()
            .iter()
            .map(|record| self.score(record, &query, patient_city.as_deref()))
            .collect();
        let considered = scored.len();

        let ranked = rank(scored, &self.options.selection);
        let (candidates, strategy) = select(ranked, &self.options.selection);

        tracing::info!(
            tokens = query.len(),
            considered,
            selected = candidates.len(),
            strategy = %strategy,
            patient_city_known = patient_city.is_some(),
            "recommendation complete"
        );

        Ok(MatchResult {
            query,
            candidates,
            strategy,
            considered,
        })
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::build(MatchOptions::default())
    }
}
