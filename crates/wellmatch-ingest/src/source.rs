//! Where registry text comes from.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::reader::read_registry_file;
use crate::error::{IngestError, Result};

/// Cooperative cancellation flag shared between a loader and its caller.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// A provider of raw registry text.
pub trait RegistrySource: Send + Sync {
    /// Short description used in logs and errors.
    fn describe(&self) -> String;

    /// Fetches the full registry text.
    ///
    /// Implementations should return [`IngestError::Cancelled`] promptly
    /// once `cancel` is triggered.
    fn fetch(&self, cancel: &CancelToken) -> Result<String>;
}

/// Registry stored in a local CSV file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegistrySource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self, cancel: &CancelToken) -> Result<String> {
        if cancel.is_cancelled() {
            return Err(IngestError::Cancelled {
                source_name: self.describe(),
            });
        }
        read_registry_file(&self.path)
    }
}

/// Registry text held in memory.
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    text: String,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl RegistrySource for StaticSource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn fetch(&self, cancel: &CancelToken) -> Result<String> {
        if cancel.is_cancelled() {
            return Err(IngestError::Cancelled {
                source_name: self.describe(),
            });
        }
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_clones_share_state() {
        let token = CancelToken::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());
        token.cancel();
        assert!(observer.is_cancelled());
    }

    #[test]
    fn static_source_honors_cancel() {
        let source = StaticSource::new("inline", "name,specialty\n");
        let cancel = CancelToken::new();
        assert_eq!(source.fetch(&cancel).unwrap(), "name,specialty\n");
        cancel.cancel();
        assert!(matches!(
            source.fetch(&cancel),
            Err(IngestError::Cancelled { .. })
        ));
    }
}
