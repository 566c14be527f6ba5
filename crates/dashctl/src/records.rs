//! Loading record collections from JSON files.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

/// One record: a JSON object keyed by field name.
pub type RecordRow = Map<String, Value>;

/// Errors raised while loading a record file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read records from {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a JSON array of objects.
    #[error("{} must hold a JSON array of objects", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads a JSON array of objects from `path`.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read or does not hold an array
/// of objects.
pub fn load(path: &Path) -> Result<Vec<RecordRow>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = parse(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), records = rows.len(), "records loaded");
    Ok(rows)
}

/// Parses a JSON array of objects.
///
/// # Errors
///
/// Returns the underlying JSON error for malformed input.
pub fn parse(content: &str) -> Result<Vec<RecordRow>, serde_json::Error> {
    serde_json::from_str(content)
}
