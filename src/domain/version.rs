//! Registry version information
//!
//! Raw per-version metadata as published by the registry, and the
//! resolved form (version + publish time + age) handed to the resolver.

use crate::error::InvalidDateError;
use crate::update::{age_in_days, IntoTimestamp};
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Per-version metadata relevant to eligibility
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionMetadata {
    /// Deprecation message; presence alone marks the version deprecated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl VersionMetadata {
    /// Metadata for a deprecated version
    pub fn deprecated(message: impl Into<String>) -> Self {
        Self {
            deprecated: Some(message.into()),
        }
    }
}

/// One registry-known release of a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    pub version: String,
    pub published_at: DateTime<Utc>,
    pub deprecated: bool,
}

impl VersionRecord {
    pub fn new(version: impl Into<String>, published_at: DateTime<Utc>) -> Self {
        Self {
            version: version.into(),
            published_at,
            deprecated: false,
        }
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }
}

/// Full version metadata of a package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMetadata {
    /// Versions in registry order
    pub versions: IndexMap<String, VersionMetadata>,
    /// Publish timestamps (ISO-8601) keyed by version
    pub publish_times: IndexMap<String, String>,
}

impl PackageMetadata {
    /// Builds metadata from version records, keeping their order
    pub fn from_records(records: impl IntoIterator<Item = VersionRecord>) -> Self {
        let mut metadata = Self::default();
        for record in records {
            let meta = if record.deprecated {
                VersionMetadata::deprecated("deprecated")
            } else {
                VersionMetadata::default()
            };
            metadata.publish_times.insert(
                record.version.clone(),
                record
                    .published_at
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            );
            metadata.versions.insert(record.version, meta);
        }
        metadata
    }

    /// Raw publish time of a version, if the registry reported one
    pub fn publish_time(&self, version: &str) -> Option<&str> {
        self.publish_times.get(version).map(String::as_str)
    }
}

/// A concrete version chosen from the registry, with its age
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedVersion {
    pub version: String,
    pub published_at: DateTime<Utc>,
    pub age_in_days: u32,
}

impl ResolvedVersion {
    /// Builds a resolved version, computing its age relative to `reference`
    pub fn at(
        version: impl Into<String>,
        published_at: impl IntoTimestamp,
        reference: impl IntoTimestamp,
    ) -> Result<Self, InvalidDateError> {
        let published_at = published_at.into_timestamp()?;
        let age_in_days = age_in_days(published_at, reference)?;
        Ok(Self {
            version: version.into(),
            published_at,
            age_in_days,
        })
    }

    /// Builds a resolved version aged against the current time
    pub fn now(
        version: impl Into<String>,
        published_at: impl IntoTimestamp,
    ) -> Result<Self, InvalidDateError> {
        Self::at(version, published_at, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_resolved_version_keeps_version_string() {
        let resolved = ResolvedVersion::at("1.2.3", "2025-06-10T12:00:00Z", reference()).unwrap();
        assert_eq!(resolved.version, "1.2.3");
        assert_eq!(resolved.age_in_days, 5);
    }

    #[test]
    fn test_resolved_version_parses_publish_time() {
        let resolved = ResolvedVersion::at("1.2.3", "2025-06-10T12:00:00Z", reference()).unwrap();
        assert_eq!(
            resolved.published_at,
            Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_resolved_version_from_datetime() {
        let published = Utc.with_ymd_and_hms(2025, 6, 5, 12, 0, 0).unwrap();
        let resolved = ResolvedVersion::at("2.0.0", published, reference()).unwrap();
        assert_eq!(resolved.age_in_days, 10);
        assert_eq!(resolved.published_at, published);
    }

    #[test]
    fn test_resolved_version_full_value() {
        let resolved = ResolvedVersion::at("3.1.4", "2025-06-01T00:00:00Z", reference()).unwrap();
        assert_eq!(
            resolved,
            ResolvedVersion {
                version: "3.1.4".to_string(),
                published_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
                age_in_days: 14,
            }
        );
    }

    #[test]
    fn test_resolved_version_rejects_invalid_date() {
        let err = ResolvedVersion::at("1.0.0", "yesterday", reference()).unwrap_err();
        assert_eq!(err.value, "yesterday");
    }

    #[test]
    fn test_metadata_from_records_preserves_order() {
        let published = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
        let metadata = PackageMetadata::from_records([
            VersionRecord::new("2.0.0", published),
            VersionRecord::new("1.0.0", published).deprecated(),
        ]);

        let versions: Vec<&str> = metadata.versions.keys().map(String::as_str).collect();
        assert_eq!(versions, vec!["2.0.0", "1.0.0"]);
        assert!(metadata.versions["1.0.0"].deprecated.is_some());
        assert_eq!(
            metadata.publish_time("2.0.0"),
            Some("2025-01-10T00:00:00.000Z")
        );
    }

    #[test]
    fn test_empty_deprecation_message_still_present() {
        let meta: VersionMetadata = serde_json::from_str(r#"{"deprecated": ""}"#).unwrap();
        assert_eq!(meta.deprecated, Some(String::new()));
    }
}
