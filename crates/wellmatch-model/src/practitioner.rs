//! Practitioner registry entries.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::ids::PractitionerId;

/// One matchable entry of the practitioner registry.
///
/// Records are built once per accepted registry row and never change
/// afterwards. Every record has a non-empty name and specialty and at
/// least one treatable symptom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PractitionerRecord {
    id: PractitionerId,
    name: String,
    specialty: String,
    treatable_symptoms: Vec<String>,
    description: String,
    rating: Option<f64>,
    location: Option<String>,
}

impl PractitionerRecord {
    /// Creates a record with an empty symptom list, falling back to the
    /// lowercased specialty as the only treatable symptom.
    pub fn new(
        id: PractitionerId,
        name: impl Into<String>,
        specialty: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into().trim().to_string();
        let specialty = specialty.into().trim().to_string();
        if name.is_empty() {
            return Err(ModelError::MissingName);
        }
        if specialty.is_empty() {
            return Err(ModelError::MissingSpecialty);
        }
        let treatable_symptoms = vec![specialty.to_lowercase()];
        Ok(Self {
            id,
            name,
            specialty,
            treatable_symptoms,
            description: String::new(),
            rating: None,
            location: None,
        })
    }

    /// Replaces the treatable symptoms.
    ///
    /// Symptoms are trimmed and lowercased; blanks are dropped. An empty
    /// list keeps the specialty fallback.
    #[must_use]
    pub fn with_symptoms<I, S>(mut self, symptoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cleaned: Vec<String> = symptoms
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if !cleaned.is_empty() {
            self.treatable_symptoms = cleaned;
        }
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into().trim().to_string();
        self
    }

    /// Sets the rating. Non-finite values are treated as unknown.
    #[must_use]
    pub fn with_rating(mut self, rating: Option<f64>) -> Self {
        self.rating = rating.filter(|r| r.is_finite());
        self
    }

    /// Sets the location label. Blank labels are treated as unknown.
    #[must_use]
    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        self
    }

    pub fn id(&self) -> &PractitionerId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn specialty(&self) -> &str {
        &self.specialty
    }

    pub fn treatable_symptoms(&self) -> &[String] {
        &self.treatable_symptoms
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Rating as recorded in the registry; `None` when unknown.
    pub fn rating(&self) -> Option<f64> {
        self.rating
    }

    /// Raw location label; `None` when unknown.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Canonical city of the location label.
    pub fn city(&self) -> Option<String> {
        self.location.as_deref().and_then(canonical_city)
    }
}

/// Extracts the canonical city from a location label.
///
/// The city is the first comma-separated segment, trimmed and lowercased:
/// `"Pune, Maharashtra"` becomes `"pune"`.
pub fn canonical_city(label: &str) -> Option<String> {
    let city = label.split(',').next().unwrap_or_default().trim();
    if city.is_empty() {
        None
    } else {
        Some(city.to_lowercase())
    }
}
