use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid practitioner id: {0:?}")]
    InvalidPractitionerId(String),
    #[error("practitioner name must not be empty")]
    MissingName,
    #[error("practitioner specialty must not be empty")]
    MissingSpecialty,
    #[error("invalid option {field}: {reason}")]
    InvalidOption { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
