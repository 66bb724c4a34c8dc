use std::fmt;

use crate::ModelError;

/// Opaque practitioner identifier.
///
/// Registries may carry numeric or textual ids; both are kept as text.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct PractitionerId(String);

impl PractitionerId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidPractitionerId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Id derived from the 1-based ingestion position of a row.
    pub fn from_position(position: usize) -> Self {
        Self(position.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PractitionerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_rejects_blank() {
        assert_eq!(PractitionerId::new("  V-12 ").unwrap().as_str(), "V-12");
        assert!(matches!(
            PractitionerId::new("   "),
            Err(ModelError::InvalidPractitionerId(_))
        ));
    }

    #[test]
    fn position_ids_render_as_numbers() {
        assert_eq!(PractitionerId::from_position(7).to_string(), "7");
    }
}
