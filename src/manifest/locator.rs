//! Locating and reading the target package.json

use crate::error::ManifestError;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Default manifest file name
pub const PACKAGE_JSON: &str = "package.json";

/// Resolve the manifest path relative to `cwd`
///
/// An absolute `custom` path is used as-is. Fails with `NotFound` when
/// the resulting file cannot be accessed.
pub fn resolve_manifest_path(custom: Option<&Path>, cwd: &Path) -> Result<PathBuf, ManifestError> {
    let path = match custom {
        Some(custom) => cwd.join(custom),
        None => cwd.join(PACKAGE_JSON),
    };

    match fs::metadata(&path) {
        Ok(metadata) if metadata.is_file() => Ok(path),
        _ => Err(ManifestError::NotFound { path }),
    }
}

/// Read and decode a manifest file
pub fn read_manifest(path: &Path) -> Result<Value, ManifestError> {
    let content = fs::read_to_string(path).map_err(|e| ManifestError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| ManifestError::InvalidManifest {
        path: path.to_path_buf(),
        source: e,
    })
}
