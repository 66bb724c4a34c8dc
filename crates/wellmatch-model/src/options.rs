//! Tunable calibration for the matching engine.
//!
//! All weights, thresholds, the synonym table, and the city coordinate table
//! live in one [`MatchOptions`] value so every caller scores with the same
//! numbers. Every field has a default, and partial JSON configuration files
//! fill the rest from [`Default`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::synonyms::SynonymTable;

/// Geographic coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Per-tier contributions and length limits for token matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    /// Shortest token kept by the normalizer.
    pub min_token_len: usize,
    /// Shortest contained token for the forward/reverse substring tiers.
    pub substring_min_len: usize,
    /// Shortest token (on both sides) for the fuzzy tier.
    pub fuzzy_min_len: usize,
    /// Fuzzy tier fires only above this similarity.
    pub fuzzy_similarity: f64,
    pub word_boundary: f64,
    pub forward: f64,
    pub reverse: f64,
    pub fuzzy: f64,
    /// Add adjacent-word phrases (within one comma segment) as tokens.
    pub phrase_bigrams: bool,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            min_token_len: 3,
            substring_min_len: 4,
            fuzzy_min_len: 4,
            fuzzy_similarity: 0.7,
            word_boundary: 0.9,
            forward: 0.7,
            reverse: 0.6,
            fuzzy: 0.5,
            phrase_bigrams: true,
        }
    }
}

/// Weights used to blend relevance, proximity and reputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Symptom relevance at or below this forces a final score of zero.
    pub relevance_floor: f64,
    /// Symptom weight when at least one exact match exists.
    pub symptom_with_exact: f64,
    pub symptom: f64,
    /// Location weight when the patient location is known.
    pub location_known: f64,
    pub location_unknown: f64,
    /// Added per exact match to the symptom relevance.
    pub exact_bonus: f64,
    /// Partial-tier matches each exact match vouches for at full credit.
    pub partial_allowance: usize,
    /// Share of credit withheld from partial-tier matches beyond the
    /// allowance.
    pub partial_discount: f64,
    pub high_relevance: f64,
    pub high_relevance_boost: f64,
    /// Minimum rating for the same-city boost.
    pub local_rating: f64,
    pub local_boost: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            relevance_floor: 0.1,
            symptom_with_exact: 0.7,
            symptom: 0.6,
            location_known: 0.25,
            location_unknown: 0.15,
            exact_bonus: 0.1,
            partial_allowance: 2,
            partial_discount: 0.5,
            high_relevance: 0.8,
            high_relevance_boost: 1.1,
            local_rating: 4.5,
            local_boost: 1.05,
        }
    }
}

/// Cutoffs, ordering bands and size bounds for result selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionOptions {
    pub max_results: usize,
    /// Final score a candidate must exceed in the primary pass.
    pub min_final_score: f64,
    /// Final score a candidate must exceed in the lowered-cutoff fallback.
    pub fallback_min_final_score: f64,
    pub fallback_results: usize,
    /// Final-score gaps at or below this are treated as ties.
    pub score_noise: f64,
    /// Coverage gaps at or below this are treated as ties.
    pub coverage_noise: f64,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            max_results: 5,
            min_final_score: 0.08,
            fallback_min_final_score: 0.03,
            fallback_results: 3,
            score_noise: 0.02,
            coverage_noise: 0.2,
        }
    }
}

/// Proximity scoring parameters and the canonical city table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationOptions {
    pub earth_radius_km: f64,
    /// Distance at which the proximity score reaches zero.
    pub max_distance_km: f64,
    /// Score used when either side has no known coordinates.
    pub unknown_score: f64,
    pub cities: BTreeMap<String, GeoPoint>,
}

const DEFAULT_CITIES: &[(&str, GeoPoint)] = &[
    ("mumbai", GeoPoint::new(19.0760, 72.8777)),
    ("delhi", GeoPoint::new(28.7041, 77.1025)),
    ("bangalore", GeoPoint::new(12.9716, 77.5946)),
    ("pune", GeoPoint::new(18.5204, 73.8567)),
    ("chennai", GeoPoint::new(13.0827, 80.2707)),
    ("kolkata", GeoPoint::new(22.5726, 88.3639)),
    ("hyderabad", GeoPoint::new(17.3850, 78.4867)),
    ("ahmedabad", GeoPoint::new(23.0225, 72.5714)),
    ("jaipur", GeoPoint::new(26.9124, 75.7873)),
    ("lucknow", GeoPoint::new(26.8467, 80.9462)),
];

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            earth_radius_km: 6371.0,
            max_distance_km: 2000.0,
            unknown_score: 0.2,
            cities: DEFAULT_CITIES
                .iter()
                .map(|(name, point)| ((*name).to_string(), *point))
                .collect(),
        }
    }
}

impl LocationOptions {
    pub fn coordinates(&self, city: &str) -> Option<GeoPoint> {
        self.cities.get(city).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingOptions {
    pub max_rating: f64,
    /// Reputation assigned to practitioners without a usable rating.
    pub unknown_reputation: f64,
}

impl Default for RatingOptions {
    fn default() -> Self {
        Self {
            max_rating: 5.0,
            unknown_reputation: 0.5,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    pub tiers: TierThresholds,
    pub weights: ScoringWeights,
    pub selection: SelectionOptions,
    pub location: LocationOptions,
    pub rating: RatingOptions,
    pub synonyms: SynonymTable,
}

impl MatchOptions {
    /// Tighter calibration: stricter fuzzy tier, wider tie band, higher
    /// primary cutoff.
    pub fn strict() -> Self {
        Self {
            tiers: TierThresholds {
                fuzzy_similarity: 0.75,
                ..TierThresholds::default()
            },
            selection: SelectionOptions {
                min_final_score: 0.15,
                score_noise: 0.10,
                ..SelectionOptions::default()
            },
            ..Self::default()
        }
    }

    /// Looser calibration for sparse registries.
    pub fn relaxed() -> Self {
        Self {
            tiers: TierThresholds {
                fuzzy_similarity: 0.6,
                ..TierThresholds::default()
            },
            selection: SelectionOptions {
                min_final_score: 0.05,
                fallback_min_final_score: 0.02,
                ..SelectionOptions::default()
            },
            ..Self::default()
        }
    }

    /// Checks that the calibration is internally consistent.
    pub fn validate(&self) -> Result<()> {
        let weights = &self.weights;
        for (field, symptom) in [
            ("weights.symptom", weights.symptom),
            ("weights.symptom_with_exact", weights.symptom_with_exact),
        ] {
            for location in [weights.location_known, weights.location_unknown] {
                if !(0.0..=1.0).contains(&symptom)
                    || !(0.0..=1.0).contains(&location)
                    || symptom + location > 1.0
                {
                    return Err(ModelError::InvalidOption {
                        field,
                        reason: format!(
                            "symptom weight {symptom} and location weight {location} must each be in [0, 1] and sum to at most 1"
                        ),
                    });
                }
            }
        }
        if self.rating.max_rating <= 0.0 || !self.rating.max_rating.is_finite() {
            return Err(ModelError::InvalidOption {
                field: "rating.max_rating",
                reason: "must be a positive number".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.rating.unknown_reputation) {
            return Err(ModelError::InvalidOption {
                field: "rating.unknown_reputation",
                reason: "must be in [0, 1]".to_string(),
            });
        }
        if self.location.max_distance_km <= 0.0 {
            return Err(ModelError::InvalidOption {
                field: "location.max_distance_km",
                reason: "must be positive".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.location.unknown_score) {
            return Err(ModelError::InvalidOption {
                field: "location.unknown_score",
                reason: "must be in [0, 1]".to_string(),
            });
        }
        if self.selection.max_results == 0 || self.selection.fallback_results == 0 {
            return Err(ModelError::InvalidOption {
                field: "selection",
                reason: "result bounds must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&weights.partial_discount) {
            return Err(ModelError::InvalidOption {
                field: "weights.partial_discount",
                reason: "must be in [0, 1]".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&weights.exact_bonus) {
            return Err(ModelError::InvalidOption {
                field: "weights.exact_bonus",
                reason: "must be in [0, 1]".to_string(),
            });
        }
        self.tiers.validate()
    }
}

impl TierThresholds {
    /// Checks that every approximate tier contributes less than an exact
    /// match and that the tiers keep their precedence order.
    pub fn validate(&self) -> Result<()> {
        for (field, len) in [
            ("tiers.min_token_len", self.min_token_len),
            ("tiers.substring_min_len", self.substring_min_len),
            ("tiers.fuzzy_min_len", self.fuzzy_min_len),
        ] {
            if len == 0 {
                return Err(ModelError::InvalidOption {
                    field,
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        if !(0.0..1.0).contains(&self.fuzzy_similarity) {
            return Err(ModelError::InvalidOption {
                field: "tiers.fuzzy_similarity",
                reason: "must be in [0, 1)".to_string(),
            });
        }
        let ordered = self.fuzzy > 0.0
            && self.fuzzy <= self.reverse
            && self.reverse <= self.forward
            && self.forward <= self.word_boundary
            && self.word_boundary < 1.0;
        if !ordered {
            return Err(ModelError::InvalidOption {
                field: "tiers",
                reason: format!(
                    "contributions must satisfy 0 < fuzzy ({}) <= reverse ({}) <= forward ({}) <= word_boundary ({}) < 1",
                    self.fuzzy, self.reverse, self.forward, self.word_boundary
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        MatchOptions::default().validate().unwrap();
        MatchOptions::strict().validate().unwrap();
        MatchOptions::relaxed().validate().unwrap();
    }

    #[test]
    fn overweight_blend_is_rejected() {
        let mut options = MatchOptions::default();
        options.weights.location_known = 0.5;
        let err = options.validate().unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidOption {
                field: "weights.symptom",
                ..
            }
        ));
    }

    #[test]
    fn approximate_tiers_cannot_outscore_exact() {
        for tiers in [
            TierThresholds {
                word_boundary: 1.5,
                ..TierThresholds::default()
            },
            TierThresholds {
                fuzzy: 3.0,
                ..TierThresholds::default()
            },
            TierThresholds {
                fuzzy: 0.0,
                ..TierThresholds::default()
            },
        ] {
            let options = MatchOptions {
                tiers,
                ..MatchOptions::default()
            };
            let err = options.validate().unwrap_err();
            assert!(
                matches!(err, ModelError::InvalidOption { field: "tiers", .. }),
                "{err}"
            );
        }
    }

    #[test]
    fn tier_limits_are_checked() {
        let mut options = MatchOptions::default();
        options.tiers.fuzzy_similarity = 1.0;
        assert!(matches!(
            options.validate().unwrap_err(),
            ModelError::InvalidOption {
                field: "tiers.fuzzy_similarity",
                ..
            }
        ));

        let mut options = MatchOptions::default();
        options.tiers.substring_min_len = 0;
        assert!(matches!(
            options.validate().unwrap_err(),
            ModelError::InvalidOption {
                field: "tiers.substring_min_len",
                ..
            }
        ));
    }

    #[test]
    fn partial_discount_is_a_share() {
        let mut options = MatchOptions::default();
        options.weights.partial_discount = 1.5;
        assert!(matches!(
            options.validate().unwrap_err(),
            ModelError::InvalidOption {
                field: "weights.partial_discount",
                ..
            }
        ));
    }

    #[test]
    fn default_city_table_has_mumbai() {
        let options = LocationOptions::default();
        assert_eq!(options.cities.len(), 10);
        assert!(options.coordinates("mumbai").is_some());
        assert!(options.coordinates("atlantis").is_none());
    }
}
