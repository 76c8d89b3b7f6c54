//! File I/O shared by both mergers
//!
//! Inputs are read as lossy UTF-8. Outputs are written atomically
//! (write-then-rename next to the target), so a failed merge never leaves a
//! partial header behind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::MergeError;

/// Path plus content digest of one file touched by a merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDigest {
    pub path: PathBuf,
    /// Lowercase hex SHA-256 of the raw bytes
    pub sha256: String,
    pub bytes: u64,
}

impl FileDigest {
    pub fn of(path: &Path, data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self {
            path: path.to_path_buf(),
            sha256: hex::encode(hasher.finalize()),
            bytes: data.len() as u64,
        }
    }
}

/// A header read from disk
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub text: String,
    pub digest: FileDigest,
}

/// Read `path` as text, replacing invalid UTF-8 sequences.
pub fn read_source(path: &Path) -> Result<SourceFile, MergeError> {
    let data = fs::read(path).map_err(|e| MergeError::io(path, e))?;
    let digest = FileDigest::of(path, &data);
    let text = String::from_utf8_lossy(&data).into_owned();
    tracing::debug!(path = %path.display(), bytes = digest.bytes, "read header");
    Ok(SourceFile { text, digest })
}

/// Write `contents` to `path` atomically, creating parent directories.
pub fn write_atomic(path: &Path, contents: &str) -> Result<FileDigest, MergeError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| MergeError::io(parent, e))?;
    }

    let temp_path = temp_path_for(path);
    fs::write(&temp_path, contents).map_err(|e| MergeError::io(&temp_path, e))?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(MergeError::io(path, e));
    }

    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote header");
    Ok(FileDigest::of(path, contents.as_bytes()))
}

/// `<name>.tmp` in the same directory as `path`
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
