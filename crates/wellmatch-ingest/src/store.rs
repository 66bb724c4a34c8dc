//! Snapshot loading and atomic publication.

use std::sync::{Arc, PoisonError, RwLock};

use wellmatch_model::RegistrySnapshot;

use crate::error::{IngestError, Result};
use crate::hash::sha256_hex;
use crate::registry::{RejectedRow, parse_registry_with_cancel};
use crate::source::{CancelToken, RegistrySource};

/// A freshly built snapshot plus the rows that did not make it in.
#[derive(Debug, Clone)]
pub struct LoadedRegistry {
    pub snapshot: RegistrySnapshot,
    pub rejected: Vec<RejectedRow>,
}

/// Fetches and parses a registry into a complete snapshot.
///
/// Fails with [`IngestError::EmptyRegistry`] when no row yields a record;
/// an empty snapshot is never produced.
pub fn load_registry(source: &dyn RegistrySource, cancel: &CancelToken) -> Result<LoadedRegistry> {
    let source_name = source.describe();
    let cancelled = || IngestError::Cancelled {
        source_name: source_name.clone(),
    };

    if cancel.is_cancelled() {
        return Err(cancelled());
    }
    let text = source.fetch(cancel)?;
    if cancel.is_cancelled() {
        return Err(cancelled());
    }

    let parsed = parse_registry_with_cancel(&text, &source_name, cancel)?;
    if parsed.records.is_empty() {
        return Err(IngestError::EmptyRegistry { source_name });
    }

    let snapshot = RegistrySnapshot::new(parsed.records, sha256_hex(text.as_bytes()), source_name);
    Ok(LoadedRegistry {
        snapshot,
        rejected: parsed.rejected,
    })
}

/// Summary of a successful [`RegistryStore::refresh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSummary {
    pub fingerprint: String,
    pub accepted: usize,
    pub rejected: usize,
    /// False when the new snapshot has the same fingerprint as the old one.
    pub changed: bool,
}

/// Holds the current registry snapshot.
///
/// Readers get an `Arc` to an immutable snapshot; a refresh swaps in a new
/// one only after it has been fully built, so queries never see partial data.
#[derive(Debug, Default)]
pub struct RegistryStore {
    current: RwLock<Option<Arc<RegistrySnapshot>>>,
}

impl RegistryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `snapshot`.
    pub fn with_snapshot(snapshot: RegistrySnapshot) -> Self {
        Self {
            current: RwLock::new(Some(Arc::new(snapshot))),
        }
    }

    /// Returns the current snapshot, or [`IngestError::RegistryUnavailable`]
    /// before the first successful load.
    pub fn snapshot(&self) -> Result<Arc<RegistrySnapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(IngestError::RegistryUnavailable)
    }

    pub fn is_loaded(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Loads `source` and publishes the result.
    ///
    /// On failure or cancellation the previous snapshot stays in place.
    pub fn refresh(
        &self,
        source: &dyn RegistrySource,
        cancel: &CancelToken,
    ) -> Result<RefreshSummary> {
        let loaded = match load_registry(source, cancel) {
            Ok(loaded) => loaded,
            Err(err) => {
                tracing::warn!(
                    source = %source.describe(),
                    error = %err,
                    "registry refresh failed, keeping previous snapshot"
                );
                return Err(err);
            }
        };
        let summary = self.publish(loaded.snapshot, loaded.rejected.len());
        Ok(summary)
    }

    /// Replaces the current snapshot.
    pub fn replace(&self, snapshot: RegistrySnapshot) -> RefreshSummary {
        self.publish(snapshot, 0)
    }

    fn publish(&self, snapshot: RegistrySnapshot, rejected: usize) -> RefreshSummary {
        let fingerprint = snapshot.fingerprint.clone();
        let accepted = snapshot.len();
        let source = snapshot.source.clone();
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let changed = guard
            .as_ref()
            .is_none_or(|old| old.fingerprint != fingerprint || fingerprint.is_empty());
        *guard = Some(Arc::new(snapshot));
        drop(guard);

        tracing::info!(
            source = %source,
            fingerprint = %short_fingerprint(&fingerprint),
            accepted,
            rejected,
            changed,
            "published registry snapshot"
        );
        RefreshSummary {
            fingerprint,
            accepted,
            rejected,
            changed,
        }
    }
}

fn short_fingerprint(fingerprint: &str) -> &str {
    fingerprint.get(..12).unwrap_or(fingerprint)
}
