//! Practitioner registry ingestion.
//!
//! This crate turns tabular practitioner exports into immutable
//! [`RegistrySnapshot`](wellmatch_model::RegistrySnapshot)s.
//!
//! # Features
//!
//! - **CSV Parsing**: rows are read with the `csv` crate, so quoted fields may
//!   hold commas, quotes and line breaks
//! - **Role Inference**: columns are mapped to roles by header keywords, not
//!   position
//! - **Row Rejection**: rows without a name or specialty are reported, never
//!   fatal
//! - **Snapshot Store**: cancellable loads with atomic publication
//!
//! # Example
//!
//! ```ignore
//! use wellmatch_ingest::{CancelToken, FileSource, RegistryStore};
//!
//! let store = RegistryStore::new();
//! store.refresh(&FileSource::new("practitioners.csv"), &CancelToken::new())?;
//! let snapshot = store.snapshot()?;
//! ```

mod error;
mod hash;
mod header;
mod reader;
mod registry;
mod source;
mod store;

// === Error Types ===
pub use error::{IngestError, Result};

// === File Reading ===
pub use reader::{
    MAX_REGISTRY_FILE_SIZE, check_file_size, check_file_size_with_limit, read_registry_file,
};

// === Header Roles ===
pub use header::{HeaderMap, HeaderRole};

// === Registry Parsing ===
pub use registry::{
    ParsedRegistry, RejectReason, RejectedRow, parse_registry, parse_registry_with_cancel,
    split_symptoms,
};

// === Sources & Store ===
pub use hash::sha256_hex;
pub use source::{CancelToken, FileSource, RegistrySource, StaticSource};
pub use store::{LoadedRegistry, RefreshSummary, RegistryStore, load_registry};
