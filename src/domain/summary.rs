//! Three-bucket resolution result

use super::{CandidateError, Resolution, SkippedDependency, UpgradeCandidate};
use serde::{Deserialize, Serialize};

/// Candidates, skipped dependencies and lookup errors of one resolution pass
///
/// Each list follows the order dependencies were declared in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub candidates: Vec<UpgradeCandidate>,
    pub skipped: Vec<SkippedDependency>,
    pub errors: Vec<CandidateError>,
}

impl ResolutionResult {
    /// Creates an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts one resolution into its bucket
    pub fn push(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Current => {}
            Resolution::Candidate(candidate) => self.candidates.push(candidate),
            Resolution::Skipped(skipped) => self.skipped.push(skipped),
            Resolution::Error(error) => self.errors.push(error),
        }
    }

    /// Returns true if no bucket has entries
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty() && self.skipped.is_empty() && self.errors.is_empty()
    }

    /// Returns true if any lookup failed
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Total number of reported entries
    pub fn total(&self) -> usize {
        self.candidates.len() + self.skipped.len() + self.errors.len()
    }
}

impl FromIterator<Resolution> for ResolutionResult {
    fn from_iter<I: IntoIterator<Item = Resolution>>(iter: I) -> Self {
        let mut result = Self::new();
        for resolution in iter {
            result.push(resolution);
        }
        result
    }
}
