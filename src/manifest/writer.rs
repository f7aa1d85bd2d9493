//! Manifest rewriting
//!
//! This module provides:
//! - ManifestWriter for applying selected upgrades to package.json
//! - Dry-run mode support (no actual file modifications)
//! - Range prefix preservation (`^` and `~`)
//! - Key order preservation when re-serializing

use crate::domain::{DependencySection, UpgradeCandidate};
use crate::error::ManifestError;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Writer for package.json files that applies selected upgrades
pub struct ManifestWriter {
    /// Whether to run in dry-run mode (no file modifications)
    dry_run: bool,
}

impl ManifestWriter {
    /// Create a new ManifestWriter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Create a ManifestWriter in dry-run mode
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }

    /// Check if this writer is in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Apply upgrades to the manifest at `path`
    ///
    /// Returns the number of entries rewritten. Candidates without a
    /// matching (section, name) entry are ignored and not counted.
    pub fn apply_upgrades(
        &self,
        path: &Path,
        candidates: &[UpgradeCandidate],
    ) -> Result<usize, ManifestError> {
        let content = fs::read_to_string(path).map_err(|e| ManifestError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut document: Value =
            serde_json::from_str(&content).map_err(|e| ManifestError::InvalidManifest {
                path: path.to_path_buf(),
                source: e,
            })?;

        let updated = apply_to_value(&mut document, candidates);

        if updated > 0 && !self.dry_run {
            let rendered = render(&document).map_err(|e| ManifestError::InvalidManifest {
                path: path.to_path_buf(),
                source: e,
            })?;
            fs::write(path, rendered).map_err(|e| ManifestError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
            debug!(path = %path.display(), updated, "manifest written");
        }

        Ok(updated)
    }
}

/// Rewrite matching entries of a decoded manifest in place
///
/// Non-string entries and sections that are not objects are left alone.
pub fn apply_to_value(document: &mut Value, candidates: &[UpgradeCandidate]) -> usize {
    let selected: HashMap<(DependencySection, &str), &UpgradeCandidate> = candidates
        .iter()
        .map(|candidate| (candidate.key(), candidate))
        .collect();

    let mut updated = 0;
    for section in DependencySection::ALL {
        let Some(entries) = document
            .get_mut(section.as_str())
            .and_then(Value::as_object_mut)
        else {
            continue;
        };

        for (name, current) in entries.iter_mut() {
            let Some(candidate) = selected.get(&(section, name.as_str())) else {
                continue;
            };
            let Some(current_range) = current.as_str() else {
                continue;
            };
            *current = Value::String(rewrite_range(current_range, &candidate.target_version));
            updated += 1;
        }
    }
    updated
}

/// New range text for `current_range` pointing at `target_version`
///
/// `^` and `~` ranges keep their operator; anything else becomes the bare
/// target version.
pub fn rewrite_range(current_range: &str, target_version: &str) -> String {
    match current_range.chars().next() {
        Some(prefix @ ('^' | '~')) => format!("{prefix}{target_version}"),
        _ => target_version.to_string(),
    }
}

/// Two-space pretty JSON with a trailing newline
fn render(document: &Value) -> Result<String, serde_json::Error> {
    let mut rendered = serde_json::to_string_pretty(document)?;
    rendered.push('\n');
    Ok(rendered)
}
