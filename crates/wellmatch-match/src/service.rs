//! Registry-backed recommendation service.

use std::sync::Arc;

use wellmatch_ingest::{
    CancelToken, IngestError, RefreshSummary, RegistrySource, RegistryStore,
};
use wellmatch_model::{MatchOptions, MatchRequest, RegistrySnapshot};

use crate::engine::MatchEngine;
use crate::error::{MatchError, Result};
use crate::report::MatchReport;

/// Couples a [`RegistryStore`] with a [`MatchEngine`].
///
/// Each query pins the snapshot current at its start, so a concurrent
/// refresh never changes the data a running query sees.
#[derive(Debug, Default)]
pub struct MatchService {
    store: RegistryStore,
    engine: MatchEngine,
}

impl MatchService {
    pub fn new(options: MatchOptions) -> Result<Self> {
        Ok(Self {
            store: RegistryStore::new(),
            engine: MatchEngine::new(options)?,
        })
    }

    pub fn with_engine(engine: MatchEngine) -> Self {
        Self {
            store: RegistryStore::new(),
            engine,
        }
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn store(&self) -> &RegistryStore {
        &self.store
    }

    /// Loads `source` into the store. See [`RegistryStore::refresh`].
    pub fn refresh(
        &self,
        source: &dyn RegistrySource,
        cancel: &CancelToken,
    ) -> std::result::Result<RefreshSummary, IngestError> {
        self.store.refresh(source, cancel)
    }

    /// Current snapshot, or [`MatchError::RegistryUnavailable`].
    pub fn snapshot(&self) -> Result<Arc<RegistrySnapshot>> {
        self.store
            .snapshot()
            .map_err(|_| MatchError::RegistryUnavailable)
    }

    /// Recommends practitioners against the current snapshot.
    pub fn recommend(&self, request: &MatchRequest) -> Result<MatchReport> {
        let snapshot = self.snapshot()?;
        let result = self.engine.recommend(&snapshot, request)?;
        Ok(MatchReport::from_result(&result, snapshot.fingerprint.clone()))
    }
}
