//! Upgrade decision logic for declared dependencies
//!
//! This module provides:
//! - Version eligibility filter (prerelease / deprecated)
//! - Publish-age calculation
//! - npm range validity, satisfaction and precedence
//! - The candidate resolver that decides which dependencies to upgrade

mod age;
mod filter;
mod range;
mod resolver;

pub use age::{age_in_days, age_in_days_now, parse_timestamp, IntoTimestamp};
pub use filter::{is_deprecated_version, is_prerelease_version, VersionFilter};
pub use range::{compare_versions, is_semver_range, parse_range, satisfies};
pub use resolver::{
    CandidateResolver, ManifestContent, ResolveOptions, Strategy, DEFAULT_CONCURRENCY,
};
