//! Size-guarded JSON artifact reads.

use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use stylist_core::errors::ModelError;

use crate::ModelResult;

/// Read and parse a required artifact.
///
/// Missing files map to `ArtifactNotFound`, oversized files to
/// `ArtifactTooLarge` (checked before reading), parse failures to
/// `ArtifactCorrupt`, and any other I/O failure to `ArtifactIo`.
pub fn read_json<T: DeserializeOwned>(path: &Path, max_bytes: u64) -> ModelResult<T> {
    let display = path.display().to_string();

    let meta = std::fs::metadata(path).map_err(|e| io_error(&display, e))?;
    if !meta.is_file() {
        return Err(ModelError::ArtifactCorrupt {
            path: display,
            reason: "not a regular file".to_string(),
        });
    }
    if meta.len() > max_bytes {
        return Err(ModelError::ArtifactTooLarge {
            path: display,
            size: meta.len(),
            limit: max_bytes,
        });
    }

    let bytes = std::fs::read(path).map_err(|e| io_error(&display, e))?;
    serde_json::from_slice(&bytes).map_err(|e| ModelError::ArtifactCorrupt {
        path: display,
        reason: e.to_string(),
    })
}

/// Like [`read_json`], but a missing file is `Ok(None)`.
pub fn read_optional_json<T: DeserializeOwned>(
    path: &Path,
    max_bytes: u64,
) -> ModelResult<Option<T>> {
    match read_json(path, max_bytes) {
        Ok(value) => Ok(Some(value)),
        Err(ModelError::ArtifactNotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

fn io_error(path: &str, e: std::io::Error) -> ModelError {
    match e.kind() {
        ErrorKind::NotFound => ModelError::ArtifactNotFound {
            path: path.to_string(),
        },
        _ => ModelError::ArtifactIo {
            path: path.to_string(),
            reason: e.to_string(),
        },
    }
}
