//! Version eligibility filter
//!
//! This module provides the VersionFilter struct that decides whether a
//! published version may be offered as an upgrade target. The default is
//! conservative: stable, non-deprecated versions only.

use crate::domain::VersionMetadata;
use indexmap::IndexMap;

/// Filter configuration for version eligibility
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionFilter {
    /// Allow versions with a prerelease component (`-beta.1`, `-rc.2`)
    pub include_prerelease: bool,
    /// Allow versions carrying a deprecation marker
    pub include_deprecated: bool,
}

impl VersionFilter {
    /// Create a new VersionFilter with default settings (stable only)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include prerelease versions
    pub fn with_prerelease(mut self, include: bool) -> Self {
        self.include_prerelease = include;
        self
    }

    /// Set whether to include deprecated versions
    pub fn with_deprecated(mut self, include: bool) -> Self {
        self.include_deprecated = include;
        self
    }

    /// Check if a version should be offered
    pub fn include(&self, version: &str, metadata: &VersionMetadata) -> bool {
        if is_prerelease_version(version) && !self.include_prerelease {
            return false;
        }
        if is_deprecated_version(metadata) && !self.include_deprecated {
            return false;
        }
        true
    }

    /// Included versions, in the iteration order of `versions`
    pub fn filter_versions<'a>(&self, versions: &'a IndexMap<String, VersionMetadata>) -> Vec<&'a str> {
        versions
            .iter()
            .filter(|(version, metadata)| self.include(version, metadata))
            .map(|(version, _)| version.as_str())
            .collect()
    }
}

/// Returns true if `version` parses as semver with a prerelease component
///
/// Unparsable strings are never prereleases.
pub fn is_prerelease_version(version: &str) -> bool {
    node_semver::Version::parse(version)
        .map(|v| !v.pre_release.is_empty())
        .unwrap_or(false)
}

/// Returns true if the metadata carries a deprecation marker
pub fn is_deprecated_version(metadata: &VersionMetadata) -> bool {
    metadata.deprecated.is_some()
}
