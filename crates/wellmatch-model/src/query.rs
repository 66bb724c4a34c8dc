//! Patient-side query types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::practitioner::canonical_city;

/// A patient request: free-text symptoms plus an optional location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub symptoms: String,
    pub location: Option<String>,
}

impl MatchRequest {
    pub fn new(symptoms: impl Into<String>) -> Self {
        Self {
            symptoms: symptoms.into(),
            location: None,
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Canonical patient city, if a usable location was given.
    pub fn city(&self) -> Option<String> {
        self.location.as_deref().and_then(canonical_city)
    }
}

/// Normalized symptom tokens for one patient query.
///
/// Never empty: normalization reports an empty query instead of building
/// one. Nothing can be added or removed after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymptomQuery {
    raw_text: String,
    extracted: Vec<String>,
    tokens: BTreeSet<String>,
}

impl SymptomQuery {
    /// Returns `None` when no tokens survived normalization.
    pub fn new(
        raw_text: impl Into<String>,
        extracted: Vec<String>,
        tokens: BTreeSet<String>,
    ) -> Option<Self> {
        if tokens.is_empty() {
            return None;
        }
        Some(Self {
            raw_text: raw_text.into().trim().to_string(),
            extracted,
            tokens,
        })
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Tokens taken directly from the text, in extraction order.
    pub fn extracted(&self) -> &[String] {
        &self.extracted
    }

    /// Extracted plus synonym-expanded tokens, deduplicated.
    pub fn tokens(&self) -> &BTreeSet<String> {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_set_is_not_a_query() {
        assert!(SymptomQuery::new("  ", Vec::new(), BTreeSet::new()).is_none());
    }

    #[test]
    fn raw_text_is_trimmed() {
        let tokens: BTreeSet<String> = ["fever".to_string()].into_iter().collect();
        let query = SymptomQuery::new("  Fever! ", vec!["fever".into()], tokens).unwrap();
        assert_eq!(query.raw_text(), "Fever!");
        assert_eq!(query.len(), 1);
    }

    #[test]
    fn request_city_uses_first_segment() {
        let request = MatchRequest::new("cough").with_location("Mumbai, Maharashtra");
        assert_eq!(request.city().as_deref(), Some("mumbai"));
        assert_eq!(MatchRequest::new("cough").city(), None);
    }
}
