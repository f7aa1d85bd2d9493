//! Per-dependency resolution outcome

use super::{CandidateError, SkippedDependency, UpgradeCandidate};

/// How a single declared dependency resolved
///
/// Every dependency terminates in exactly one of these states; the
/// resolver sorts them into result buckets afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The eligible target already satisfies the declared range
    Current,
    /// An upgrade is available
    Candidate(UpgradeCandidate),
    /// Considered but excluded
    Skipped(SkippedDependency),
    /// The lookup failed
    Error(CandidateError),
}

impl Resolution {
    /// Returns true if the dependency is already up to date
    pub fn is_current(&self) -> bool {
        matches!(self, Resolution::Current)
    }

    /// Returns true if an upgrade is available
    pub fn is_candidate(&self) -> bool {
        matches!(self, Resolution::Candidate(_))
    }
}
