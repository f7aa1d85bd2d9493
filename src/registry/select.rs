//! Target version selection over registry metadata
//!
//! Pure functions: the caller supplies the metadata, the version filter
//! and the reference time used for ages.

use crate::domain::{PackageMetadata, ResolvedVersion};
use crate::error::RegistryError;
use crate::update::{compare_versions, VersionFilter};
use chrono::{DateTime, Utc};
use node_semver::Version;

/// Filter-eligible versions that have a publish time, highest first
///
/// Versions that do not parse as semver are dropped.
fn eligible_descending<'a>(
    metadata: &'a PackageMetadata,
    filter: &VersionFilter,
) -> Vec<(&'a str, &'a str)> {
    let mut eligible: Vec<(&str, &str)> = filter
        .filter_versions(&metadata.versions)
        .into_iter()
        .filter(|version| Version::parse(*version).is_ok())
        .filter_map(|version| Some((version, metadata.publish_time(version)?)))
        .collect();

    eligible.sort_by(|(a, _), (b, _)| compare_versions(b, a));
    eligible
}

/// Highest eligible version
///
/// Fails with `VersionNotFound { version: "latest" }` when nothing is
/// eligible.
pub fn latest_eligible(
    package: &str,
    metadata: &PackageMetadata,
    filter: &VersionFilter,
    reference: DateTime<Utc>,
) -> Result<ResolvedVersion, RegistryError> {
    let (version, published) = eligible_descending(metadata, filter)
        .into_iter()
        .next()
        .ok_or_else(|| RegistryError::version_not_found(package, "latest"))?;
    Ok(ResolvedVersion::at(version, published, reference)?)
}

/// Highest eligible version published at least `min_age_days` days before
/// `reference`
pub fn latest_eligible_at_least(
    metadata: &PackageMetadata,
    filter: &VersionFilter,
    min_age_days: u32,
    reference: DateTime<Utc>,
) -> Result<Option<ResolvedVersion>, RegistryError> {
    for (version, published) in eligible_descending(metadata, filter) {
        let resolved = ResolvedVersion::at(version, published, reference)?;
        if resolved.age_in_days >= min_age_days {
            return Ok(Some(resolved));
        }
    }
    Ok(None)
}
