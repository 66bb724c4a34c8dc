//! Lay-term synonym clusters used for query expansion.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Canonical medical concept → lay synonyms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SynonymTable {
    clusters: BTreeMap<String, Vec<String>>,
}

const DEFAULT_CLUSTERS: &[(&str, &[&str])] = &[
    ("pain", &["ache", "hurt", "sore", "discomfort", "agony"]),
    ("fever", &["temperature", "hot", "burning"]),
    (
        "headache",
        &["head pain", "migraine", "head ache", "cephalgia"],
    ),
    ("stomach", &["belly", "tummy", "abdomen", "gastric"]),
    ("cold", &["flu", "cough", "runny nose", "congestion"]),
    ("breathing", &["respiratory", "lung", "pulmonary"]),
    ("joint", &["knee", "elbow", "shoulder", "hip", "ankle", "wrist"]),
    (
        "skin",
        &[
            "rash",
            "itching",
            "allergy",
            "dermatitis",
            "dermal",
            "cutaneous",
        ],
    ),
    ("heart", &["cardiac", "cardiovascular"]),
    ("mental", &["psychological", "psychiatric", "emotional"]),
];

impl Default for SynonymTable {
    fn default() -> Self {
        let clusters = DEFAULT_CLUSTERS
            .iter()
            .map(|(canonical, synonyms)| {
                (
                    (*canonical).to_string(),
                    synonyms.iter().map(|s| (*s).to_string()).collect(),
                )
            })
            .collect();
        Self { clusters }
    }
}

impl SynonymTable {
    /// An empty table; expansion becomes a no-op.
    pub fn empty() -> Self {
        Self {
            clusters: BTreeMap::new(),
        }
    }

    /// Adds or replaces a cluster. Terms are lowercased and trimmed.
    pub fn insert<I, S>(&mut self, canonical: &str, synonyms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let synonyms = synonyms
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        self.clusters
            .insert(canonical.trim().to_lowercase(), synonyms);
    }

    /// Iterates `(canonical, synonyms)` pairs in canonical order.
    pub fn clusters(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.clusters
            .iter()
            .map(|(canonical, synonyms)| (canonical.as_str(), synonyms.as_slice()))
    }

    pub fn synonyms_of(&self, canonical: &str) -> Option<&[String]> {
        self.clusters.get(canonical).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}
