//! Free-text symptom normalization.
//!
//! Text is lowercased and stripped to letters, whitespace and commas. Words
//! shorter than the minimum token length are dropped. Adjacent kept words in
//! the same comma segment also form two-word phrases, so "joint pain" can
//! match a practitioner symptom of the same name exactly. Finally every
//! token is expanded through the synonym table.

use std::collections::BTreeSet;

use wellmatch_model::{SymptomQuery, SynonymTable, TierThresholds};

use crate::error::{MatchError, Result};
use crate::text::{char_len, contains_word};

/// Turns patient text into a [`SymptomQuery`].
#[derive(Debug, Clone)]
pub struct QueryNormalizer {
    synonyms: SynonymTable,
    /// Every canonical term and synonym, for the "already a known term" check.
    known_terms: BTreeSet<String>,
    min_token_len: usize,
    phrase_bigrams: bool,
}

impl QueryNormalizer {
    pub fn new(synonyms: SynonymTable, tiers: &TierThresholds) -> Self {
        let known_terms = synonyms
            .clusters()
            .flat_map(|(canonical, terms)| {
                std::iter::once(canonical.to_string()).chain(terms.iter().cloned())
            })
            .collect();
        Self {
            synonyms,
            known_terms,
            min_token_len: tiers.min_token_len,
            phrase_bigrams: tiers.phrase_bigrams,
        }
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    /// Normalizes `text`, failing with [`MatchError::EmptyQuery`] when no
    /// word is long enough to keep.
    pub fn normalize(&self, text: &str) -> Result<SymptomQuery> {
        let extracted = self.extract(text);
        let mut tokens: BTreeSet<String> = extracted.iter().cloned().collect();
        for token in &extracted {
            self.expand(token, &mut tokens);
        }
        SymptomQuery::new(text, extracted, tokens).ok_or(MatchError::EmptyQuery)
    }

    /// Tokens taken from the text itself, in order of appearance.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let cleansed = cleanse(text);
        let mut extracted: Vec<String> = Vec::new();
        let mut push = |token: String| {
            if !extracted.contains(&token) {
                extracted.push(token);
            }
        };

        for segment in cleansed.split(',') {
            let mut previous: Option<&str> = None;
            for word in segment.split_whitespace() {
                if char_len(word) < self.min_token_len {
                    previous = None;
                    continue;
                }
                push(word.to_string());
                if self.phrase_bigrams
                    && let Some(prev) = previous
                {
                    push(format!("{prev} {word}"));
                }
                previous = Some(word);
            }
        }
        extracted
    }

    fn expand(&self, token: &str, tokens: &mut BTreeSet<String>) {
        // A token that already names a concept does not reach into phrases of
        // other clusters ("pain" stays out of "head pain").
        let known = self.known_terms.contains(token);
        for (canonical, terms) in self.synonyms.clusters() {
            let hit = std::iter::once(canonical)
                .chain(terms.iter().map(String::as_str))
                .any(|term| {
                    token == term
                        || contains_word(token, term)
                        || (!known && contains_word(term, token))
                });
            if hit {
                tokens.insert(canonical.to_string());
                tokens.extend(terms.iter().cloned());
            }
        }
    }
}

impl Default for QueryNormalizer {
    fn default() -> Self {
        Self::new(SynonymTable::default(), &TierThresholds::default())
    }
}

/// Lowercases and keeps only ASCII letters, whitespace and commas.
fn cleanse(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace() || *c == ',')
        .collect()
}
