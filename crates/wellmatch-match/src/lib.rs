//! Symptom-to-practitioner matching.
//!
//! The pipeline for one request:
//!
//! 1. [`QueryNormalizer`] turns free text into symptom tokens and expands
//!    them through the synonym table.
//! 2. [`SymptomScorer`] compares every practitioner symptom with the tokens
//!    using five match tiers (exact, word boundary, forward, reverse, fuzzy).
//! 3. Relevance, proximity and reputation blend into a final score.
//! 4. [`rank`] orders candidates with noise-tolerant tie bands.
//! 5. [`select`] keeps one practitioner per specialty first and falls back
//!    through lowered cutoffs and reputation so a non-empty registry always
//!    yields a recommendation.
//!
//! # Example
//!
//! ```ignore
//! use wellmatch_match::MatchEngine;
//! use wellmatch_model::MatchRequest;
//!
//! let engine = MatchEngine::default();
//! let request = MatchRequest::new("terrible headache").with_location("Mumbai");
//! let result = engine.recommend(&snapshot, &request)?;
//! for candidate in &result.candidates {
//!     println!("{} {}%", candidate.practitioner.name(), candidate.percent());
//! }
//! ```

#![deny(unsafe_code)]

mod engine;
mod error;
mod location;
mod normalize;
mod rank;
mod report;
mod score;
mod select;
mod service;
mod text;

pub use engine::{MatchEngine, MatchResult};
pub use error::{MatchError, Result};
pub use location::{LocationScore, haversine_km, location_score};
pub use normalize::QueryNormalizer;
pub use rank::{ScoredCandidate, compare_candidates, final_score, rank};
pub use report::{MatchEntry, MatchReport, MatchedSymptom};
pub use score::{MatchTier, SymptomMatch, SymptomRelevance, SymptomScorer, reputation_score};
pub use select::{SelectionStrategy, select};
pub use service::MatchService;
pub use text::{contains_word, edit_distance, similarity};
