//! npm range semantics
//!
//! Thin helpers over `node_semver` so the resolver and the registry
//! selection agree on what a valid range is and how versions compare.

use node_semver::{Range, Version};
use std::cmp::Ordering;

/// Characters that only occur in source specifiers (protocols, git shorthands)
const PROTOCOL_MARKERS: [char; 2] = [':', '/'];

/// Parses a declared range, returning None for non-semver specifiers
///
/// `workspace:*`, `file:../x`, `github:owner/repo#ref`, `owner/repo` and
/// dist-tags such as `latest` are not ranges. An empty range means `*`.
pub fn parse_range(wanted_range: &str) -> Option<Range> {
    if wanted_range.contains(&PROTOCOL_MARKERS[..]) {
        return None;
    }
    let trimmed = wanted_range.trim();
    let normalized = if trimmed.is_empty() { "*" } else { trimmed };
    Range::parse(normalized).ok()
}

/// Returns true if `wanted_range` is a valid npm range
pub fn is_semver_range(wanted_range: &str) -> bool {
    parse_range(wanted_range).is_some()
}

/// Returns true if `version` parses and satisfies `range`
pub fn satisfies(range: &Range, version: &str) -> bool {
    Version::parse(version)
        .map(|v| range.satisfies(&v))
        .unwrap_or(false)
}

/// Compare two version strings by semver precedence
///
/// Unparsable versions sort below parsable ones.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (Version::parse(a), Version::parse(b)) {
        (Ok(va), Ok(vb)) => va.cmp(&vb),
        (Ok(_), Err(_)) => Ordering::Greater,
        (Err(_), Ok(_)) => Ordering::Less,
        (Err(_), Err(_)) => Ordering::Equal,
    }
}
