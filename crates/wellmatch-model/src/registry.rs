//! Read-only registry snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::practitioner::PractitionerRecord;

/// An immutable view of the practitioner registry.
///
/// A snapshot is built in full before it is published; refreshes replace
/// the whole snapshot rather than editing one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    records: Vec<PractitionerRecord>,
    /// Hex SHA-256 of the source text the snapshot was parsed from.
    pub fingerprint: String,
    /// Human-readable description of where the data came from.
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}

impl RegistrySnapshot {
    pub fn new(
        records: Vec<PractitionerRecord>,
        fingerprint: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            records,
            fingerprint: fingerprint.into(),
            source: source.into(),
            loaded_at: Utc::now(),
        }
    }

    /// Builds a snapshot from records without a backing source text.
    pub fn from_records(records: Vec<PractitionerRecord>) -> Self {
        Self::new(records, String::new(), "in-memory")
    }

    pub fn records(&self) -> &[PractitionerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct specialties, compared case-insensitively.
    pub fn specialty_count(&self) -> usize {
        let mut seen: Vec<String> = self
            .records
            .iter()
            .map(|r| r.specialty().to_lowercase())
            .collect();
        seen.sort();
        seen.dedup();
        seen.len()
    }
}
