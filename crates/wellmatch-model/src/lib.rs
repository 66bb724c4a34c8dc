//! Core types for symptom-to-practitioner matching.
//!
//! The model crate holds the registry records, the patient query types and
//! the engine calibration. It has no behavior beyond construction-time
//! validation; parsing lives in `wellmatch-ingest` and scoring in
//! `wellmatch-match`.

#![deny(unsafe_code)]

pub mod error;
pub mod ids;
pub mod options;
pub mod practitioner;
pub mod query;
pub mod registry;
pub mod synonyms;

pub use error::{ModelError, Result};
pub use ids::PractitionerId;
pub use options::{
    GeoPoint, LocationOptions, MatchOptions, RatingOptions, ScoringWeights, SelectionOptions,
    TierThresholds,
};
pub use practitioner::{PractitionerRecord, canonical_city};
pub use query::{MatchRequest, SymptomQuery};
pub use registry::RegistrySnapshot;
pub use synonyms::SynonymTable;
