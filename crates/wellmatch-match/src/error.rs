//! Error types for matching operations.

use thiserror::Error;
use wellmatch_model::ModelError;

/// Errors from normalization, recommendation and the match service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// No token survived normalization.
    #[error("symptom text contains no usable words")]
    EmptyQuery,

    /// The registry snapshot holds no practitioners.
    #[error("practitioner registry is empty")]
    NoData,

    /// The service has not loaded a registry yet.
    #[error("practitioner registry has not been loaded")]
    RegistryUnavailable,

    #[error("invalid match options: {0}")]
    InvalidOptions(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, MatchError>;
