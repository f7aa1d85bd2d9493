//! Core domain models for pkgbump
//!
//! This module contains the value types exchanged between the manifest
//! parser, the registry lookup, the candidate resolver and the CLI:
//! - Declared dependencies and their manifest section
//! - Registry version records and resolved versions with age
//! - Upgrade candidates, skipped dependencies and lookup errors
//! - The three-bucket resolution result

mod candidate;
mod dependency;
mod summary;
mod update_result;
mod version;

pub use candidate::{
    CandidateError, CandidateReason, Criterion, ErrorReason, SkipReason, SkippedDependency,
    UpgradeCandidate,
};
pub use dependency::{DeclaredDependency, DependencySection};
pub use summary::ResolutionResult;
pub use update_result::Resolution;
pub use version::{PackageMetadata, ResolvedVersion, VersionMetadata, VersionRecord};
