//! Upgrade candidate, skipped dependency and lookup error entries
//!
//! These three shapes are consumed by the selection prompt, the manifest
//! writer and the JSON report, so their serialized field sets are stable.

use super::{DeclaredDependency, DependencySection};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which strategy produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Criterion {
    /// Latest eligible version
    Latest,
    /// Latest eligible version at least N days old
    MinAge,
}

/// Why a dependency became a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateReason {
    /// The target version falls outside the declared range
    TargetNotSatisfiedByRange,
}

/// Why a dependency was left out without error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Declared specifier is not a semver range (workspace:, file:, git, tags)
    NonSemverSpecifier,
    /// No eligible version is old enough
    NoEligibleTargetForMinAge,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NonSemverSpecifier => write!(f, "non-semver specifier"),
            SkipReason::NoEligibleTargetForMinAge => {
                write!(f, "no eligible version old enough")
            }
        }
    }
}

/// Classified lookup failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReason {
    PackageNotFound,
    NetworkError,
    UnknownError,
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorReason::PackageNotFound => write!(f, "package not found"),
            ErrorReason::NetworkError => write!(f, "network error"),
            ErrorReason::UnknownError => write!(f, "unknown error"),
        }
    }
}

/// A dependency whose eligible target lies outside its declared range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeCandidate {
    pub name: String,
    pub section: DependencySection,
    pub wanted_range: String,
    pub target_version: String,
    pub criterion: Criterion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_age_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_label: Option<String>,
    pub reason: CandidateReason,
}

impl UpgradeCandidate {
    /// Candidate produced by the latest strategy
    pub fn latest(dependency: &DeclaredDependency, target_version: impl Into<String>) -> Self {
        Self {
            name: dependency.name.clone(),
            section: dependency.section,
            wanted_range: dependency.wanted_range.clone(),
            target_version: target_version.into(),
            criterion: Criterion::Latest,
            min_age_days: None,
            source_label: dependency.source_label.clone(),
            reason: CandidateReason::TargetNotSatisfiedByRange,
        }
    }

    /// Candidate produced by the minimum-age strategy
    pub fn min_age(
        dependency: &DeclaredDependency,
        target_version: impl Into<String>,
        min_age_days: u32,
    ) -> Self {
        Self {
            criterion: Criterion::MinAge,
            min_age_days: Some(min_age_days),
            ..Self::latest(dependency, target_version)
        }
    }

    /// Returns a copy targeting a different version
    pub fn with_target_version(mut self, version: impl Into<String>) -> Self {
        self.target_version = version.into();
        self
    }

    /// Key identifying the manifest entry this candidate rewrites
    pub fn key(&self) -> (DependencySection, &str) {
        (self.section, &self.name)
    }
}

impl fmt::Display for UpgradeCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} -> {}",
            self.section, self.name, self.wanted_range, self.target_version
        )
    }
}

/// A dependency deliberately excluded from candidacy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedDependency {
    pub name: String,
    pub section: DependencySection,
    pub wanted_range: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_label: Option<String>,
    pub reason: SkipReason,
}

impl SkippedDependency {
    pub fn new(dependency: &DeclaredDependency, reason: SkipReason) -> Self {
        Self {
            name: dependency.name.clone(),
            section: dependency.section,
            wanted_range: dependency.wanted_range.clone(),
            source_label: dependency.source_label.clone(),
            reason,
        }
    }
}

/// A dependency whose registry lookup failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateError {
    pub name: String,
    pub section: DependencySection,
    pub wanted_range: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_label: Option<String>,
    pub reason: ErrorReason,
    pub message: String,
}

impl CandidateError {
    pub fn new(
        dependency: &DeclaredDependency,
        reason: ErrorReason,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: dependency.name.clone(),
            section: dependency.section,
            wanted_range: dependency.wanted_range.clone(),
            source_label: dependency.source_label.clone(),
            reason,
            message: message.into(),
        }
    }
}
