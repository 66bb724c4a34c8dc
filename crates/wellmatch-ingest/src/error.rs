//! Error types for registry ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a practitioner registry.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Registry file not found.
    #[error("registry file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the configured size limit.
    #[error("registry file {path} is {size} bytes, limit is {max_size}")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// File uses an encoding we do not decode.
    #[error("unsupported encoding {encoding} in {path}")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === Parsing Errors ===
    /// The CSV reader rejected the source text.
    #[error("failed to parse CSV {source_name}: {message}")]
    CsvParse {
        source_name: String,
        message: String,
    },

    /// Source text has no header line.
    #[error("could not detect header row in {source_name}")]
    NoHeaderDetected { source_name: String },

    /// Header has neither a name-like nor a specialty-like column.
    #[error("header of {source_name} has no {role} column")]
    MissingRole {
        source_name: String,
        role: &'static str,
    },

    /// No row produced a usable practitioner.
    #[error("no practitioners could be read from {source_name}")]
    EmptyRegistry { source_name: String },

    // === Loading Errors ===
    /// Fetch or parse was cancelled by the caller.
    #[error("registry load from {source_name} was cancelled")]
    Cancelled { source_name: String },

    /// No snapshot has been loaded yet.
    #[error("registry unavailable: no snapshot has been loaded")]
    RegistryUnavailable,
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/data/practitioners.csv"),
        };
        assert_eq!(
            err.to_string(),
            "registry file not found: /data/practitioners.csv"
        );
    }

    #[test]
    fn test_missing_role_display() {
        let err = IngestError::MissingRole {
            source_name: "inline".to_string(),
            role: "name",
        };
        assert_eq!(err.to_string(), "header of inline has no name column");
    }
}
