//! Registry file reading with size and encoding guards.

use std::path::Path;

use encoding_rs::WINDOWS_1252;

use crate::error::{IngestError, Result};

/// Maximum registry file size (64 MB default).
pub const MAX_REGISTRY_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Check file size before loading.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_REGISTRY_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| io_error(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Reads a registry file into text.
///
/// UTF-16 files (detected by BOM) are rejected. A UTF-8 BOM is stripped.
/// Bytes that are not valid UTF-8 are decoded as Windows-1252, which is what
/// spreadsheet exports on Windows usually produce.
pub fn read_registry_file(path: &Path) -> Result<String> {
    check_file_size(path)?;
    let bytes = std::fs::read(path).map_err(|e| io_error(path, e))?;
    decode_registry_bytes(path, bytes)
}

fn decode_registry_bytes(path: &Path, bytes: Vec<u8>) -> Result<String> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 LE",
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 BE",
        });
    }

    match String::from_utf8(bytes) {
        Ok(text) => Ok(match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        }),
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                "registry is not valid UTF-8, decoding as Windows-1252"
            );
            let bytes = err.into_bytes();
            let (text, _, _) = WINDOWS_1252.decode(&bytes);
            Ok(text.into_owned())
        }
    }
}

fn io_error(path: &Path, e: std::io::Error) -> IngestError {
    if e.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn strips_utf8_bom() {
        let file = temp_file(b"\xEF\xBB\xBFname,specialty\n");
        let text = read_registry_file(file.path()).unwrap();
        assert_eq!(text, "name,specialty\n");
    }

    #[test]
    fn rejects_utf16() {
        let file = temp_file(&[0xFF, 0xFE, b'n', 0]);
        let err = read_registry_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            }
        ));
    }

    #[test]
    fn decodes_windows_1252() {
        // 0xE9 is "é" in Windows-1252 and invalid as a lone UTF-8 byte.
        let file = temp_file(b"name\nRen\xE9\n");
        let text = read_registry_file(file.path()).unwrap();
        assert_eq!(text, "name\nRen\u{e9}\n");
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = read_registry_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }

    #[test]
    fn size_limit_is_enforced() {
        let file = temp_file(b"0123456789");
        let err = check_file_size_with_limit(file.path(), 4).unwrap_err();
        assert!(matches!(err, IngestError::FileTooLarge { size: 10, .. }));
    }
}
