//! Upgrade candidate resolver
//!
//! Walks the declared dependencies of a manifest, asks the registry lookup
//! for an eligible target under the chosen strategy, and sorts every
//! dependency into one of three buckets: candidates, skipped, errors.
//!
//! Lookup failures are data, not control flow: one package failing never
//! stops the others. Only option validation and manifest parsing can fail
//! the whole call.

use super::range::{parse_range, satisfies};
use crate::domain::{
    CandidateError, DeclaredDependency, Resolution, ResolutionResult, SkipReason,
    SkippedDependency, UpgradeCandidate,
};
use crate::error::ResolveError;
use crate::manifest::{PackageJsonParser, ParseOptions};
use crate::registry::VersionLookup;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default number of registry lookups kept in flight
pub const DEFAULT_CONCURRENCY: usize = 8;

/// How the target version is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Strategy {
    /// Latest eligible version
    #[default]
    Latest,
    /// Latest eligible version published at least `min_age_days` ago
    MinAge {
        #[serde(rename = "minAgeDays")]
        min_age_days: u32,
    },
}

impl Strategy {
    /// Strategy for a `--min-age-days` value; zero means latest
    pub fn from_min_age_days(days: u32) -> Self {
        if days == 0 {
            Strategy::Latest
        } else {
            Strategy::MinAge { min_age_days: days }
        }
    }
}

/// Options for one resolution pass
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub strategy: Strategy,
    /// Attached to every output entry
    pub source_label: Option<String>,
    /// Maximum lookups in flight; `None` uses [`DEFAULT_CONCURRENCY`]
    pub concurrency: Option<usize>,
}

impl ResolveOptions {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = Some(label.into());
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }
}

/// Manifest input: raw JSON text or an already decoded document
#[derive(Debug, Clone, Copy)]
pub enum ManifestContent<'a> {
    Text(&'a str),
    Value(&'a Value),
}

impl<'a> From<&'a str> for ManifestContent<'a> {
    fn from(text: &'a str) -> Self {
        ManifestContent::Text(text)
    }
}

impl<'a> From<&'a String> for ManifestContent<'a> {
    fn from(text: &'a String) -> Self {
        ManifestContent::Text(text)
    }
}

impl<'a> From<&'a Value> for ManifestContent<'a> {
    fn from(value: &'a Value) -> Self {
        ManifestContent::Value(value)
    }
}

/// Finds dependencies whose eligible target lies outside the declared range
pub struct CandidateResolver {
    parser: PackageJsonParser,
    lookup: Arc<dyn VersionLookup>,
}

impl CandidateResolver {
    /// Create a resolver over a manifest parser and a registry lookup
    pub fn new(parser: PackageJsonParser, lookup: Arc<dyn VersionLookup>) -> Self {
        Self { parser, lookup }
    }

    /// Resolve upgrade candidates for every declared dependency
    pub async fn find_candidates<'a>(
        &self,
        manifest: impl Into<ManifestContent<'a>>,
        options: &ResolveOptions,
    ) -> Result<ResolutionResult, ResolveError> {
        let concurrency = validate_concurrency(options.concurrency)?;

        let parse_options = ParseOptions {
            source_label: options.source_label.clone(),
        };
        let dependencies = match manifest.into() {
            ManifestContent::Text(text) => self.parser.parse_str(text, &parse_options)?,
            ManifestContent::Value(value) => self.parser.parse_value(value, &parse_options)?,
        };

        if dependencies.is_empty() {
            return Ok(ResolutionResult::new());
        }

        let limit = concurrency.min(dependencies.len());
        debug!(
            dependencies = dependencies.len(),
            limit, "resolving upgrade candidates"
        );

        let strategy = options.strategy;
        let resolutions: Vec<Resolution> = stream::iter(dependencies.iter())
            .map(|dependency| self.resolve_one(dependency, strategy))
            .buffered(limit)
            .collect()
            .await;

        let result: ResolutionResult = resolutions.into_iter().collect();
        info!(
            candidates = result.candidates.len(),
            skipped = result.skipped.len(),
            errors = result.errors.len(),
            "resolution finished"
        );
        Ok(result)
    }

    async fn resolve_one(&self, dependency: &DeclaredDependency, strategy: Strategy) -> Resolution {
        let Some(range) = parse_range(&dependency.wanted_range) else {
            debug!(dependency = %dependency, "skipping non-semver specifier");
            return Resolution::Skipped(SkippedDependency::new(
                dependency,
                SkipReason::NonSemverSpecifier,
            ));
        };

        let target = match strategy {
            Strategy::Latest => self
                .lookup
                .latest_eligible(&dependency.name)
                .await
                .map(Some),
            Strategy::MinAge { min_age_days } => {
                self.lookup
                    .latest_eligible_at_least(&dependency.name, min_age_days)
                    .await
            }
        };

        let target = match target {
            Ok(Some(target)) => target,
            Ok(None) => {
                debug!(dependency = %dependency, "no version old enough");
                return Resolution::Skipped(SkippedDependency::new(
                    dependency,
                    SkipReason::NoEligibleTargetForMinAge,
                ));
            }
            Err(e) => {
                warn!(dependency = %dependency, error = %e, "registry lookup failed");
                return Resolution::Error(CandidateError::new(
                    dependency,
                    e.reason(),
                    e.to_string(),
                ));
            }
        };

        if satisfies(&range, &target.version) {
            debug!(dependency = %dependency, target = %target.version, "already satisfied");
            return Resolution::Current;
        }

        debug!(dependency = %dependency, target = %target.version, "upgrade available");
        let candidate = match strategy {
            Strategy::Latest => UpgradeCandidate::latest(dependency, target.version),
            Strategy::MinAge { min_age_days } => {
                UpgradeCandidate::min_age(dependency, target.version, min_age_days)
            }
        };
        Resolution::Candidate(candidate)
    }
}

fn validate_concurrency(concurrency: Option<usize>) -> Result<usize, ResolveError> {
    match concurrency {
        None => Ok(DEFAULT_CONCURRENCY),
        Some(0) => Err(ResolveError::invalid_option(
            "concurrency",
            "must be an integer >= 1",
        )),
        Some(n) => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Criterion, DependencySection, ErrorReason, PackageMetadata, ResolvedVersion,
    };
    use crate::error::{ManifestError, RegistryError};
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    enum Answer {
        Version(&'static str),
        NotFound,
        Network(&'static str),
        VersionNotFound,
    }

    /// Scripted lookup that records calls and tracks in-flight requests
    #[derive(Default)]
    struct FakeLookup {
        latest: HashMap<String, Answer>,
        aged: HashMap<String, Option<&'static str>>,
        calls: Mutex<Vec<String>>,
        min_age_args: Mutex<Vec<u32>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        delay: Option<Duration>,
    }

    impl FakeLookup {
        fn new() -> Self {
            Self::default()
        }

        fn latest(mut self, name: &str, answer: Answer) -> Self {
            self.latest.insert(name.to_string(), answer);
            self
        }

        fn aged(mut self, name: &str, version: Option<&'static str>) -> Self {
            self.aged.insert(name.to_string(), version);
            self
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        async fn enter(&self, name: &str) {
            self.calls.lock().unwrap().push(name.to_string());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            match self.delay {
                Some(delay) => tokio::time::sleep(delay).await,
                None => tokio::task::yield_now().await,
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn published() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap()
    }

    fn resolved(version: &str) -> ResolvedVersion {
        ResolvedVersion {
            version: version.to_string(),
            published_at: published(),
            age_in_days: 30,
        }
    }

    #[async_trait]
    impl VersionLookup for FakeLookup {
        async fn fetch_metadata(&self, package: &str) -> Result<PackageMetadata, RegistryError> {
            Err(RegistryError::package_not_found(package))
        }

        async fn latest_eligible(&self, package: &str) -> Result<ResolvedVersion, RegistryError> {
            self.enter(package).await;
            match self.latest.get(package) {
                Some(Answer::Version(v)) => Ok(resolved(v)),
                Some(Answer::Network(msg)) => Err(RegistryError::network(package, *msg)),
                Some(Answer::VersionNotFound) => {
                    Err(RegistryError::version_not_found(package, "latest"))
                }
                Some(Answer::NotFound) | None => Err(RegistryError::package_not_found(package)),
            }
        }

        async fn latest_eligible_at_least(
            &self,
            package: &str,
            min_age_days: u32,
        ) -> Result<Option<ResolvedVersion>, RegistryError> {
            self.enter(package).await;
            self.min_age_args.lock().unwrap().push(min_age_days);
            match self.aged.get(package) {
                Some(found) => Ok(found.map(resolved)),
                None => Err(RegistryError::package_not_found(package)),
            }
        }
    }

    fn resolver(lookup: Arc<FakeLookup>) -> CandidateResolver {
        CandidateResolver::new(PackageJsonParser::new(), lookup)
    }

    fn react_manifest() -> Value {
        json!({
            "dependencies": {"react": "^18.2.0"},
            "devDependencies": {"typescript": "~5.7.0"}
        })
    }

    #[tokio::test]
    async fn test_latest_strategy_finds_candidates() {
        let lookup = Arc::new(
            FakeLookup::new()
                .latest("react", Answer::Version("19.0.1"))
                .latest("typescript", Answer::Version("5.8.0")),
        );
        let result = resolver(lookup)
            .find_candidates(&react_manifest(), &ResolveOptions::default())
            .await
            .unwrap();

        assert_eq!(result.candidates.len(), 2);
        let react = &result.candidates[0];
        assert_eq!(react.name, "react");
        assert_eq!(react.section, DependencySection::Dependencies);
        assert_eq!(react.wanted_range, "^18.2.0");
        assert_eq!(react.target_version, "19.0.1");
        assert_eq!(react.criterion, Criterion::Latest);
        assert_eq!(react.min_age_days, None);

        let typescript = &result.candidates[1];
        assert_eq!(typescript.section, DependencySection::DevDependencies);
        assert_eq!(typescript.target_version, "5.8.0");
        assert!(result.skipped.is_empty());
        assert!(result.errors.is_empty());
    }

    #[tokio::test]
    async fn test_satisfied_range_produces_no_output() {
        let lookup = Arc::new(FakeLookup::new().latest("react", Answer::Version("18.3.1")));
        let result = resolver(lookup)
            .find_candidates(
                r#"{"dependencies": {"react": "^18.2.0"}}"#,
                &ResolveOptions::default(),
            )
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_empty_range_is_looked_up_and_current() {
        let lookup = Arc::new(FakeLookup::new().latest("left-pad", Answer::Version("1.3.0")));
        let result = resolver(Arc::clone(&lookup))
            .find_candidates(
                r#"{"dependencies": {"left-pad": ""}}"#,
                &ResolveOptions::default(),
            )
            .await
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(lookup.calls(), vec!["left-pad"]);
    }

    #[tokio::test]
    async fn test_non_semver_specifiers_are_skipped_without_lookup() {
        let lookup = Arc::new(FakeLookup::new().latest("react", Answer::Version("19.0.1")));
        let manifest = json!({
            "dependencies": {
                "local": "file:../x",
                "mono": "workspace:*",
                "fork": "github:owner/repo#main",
                "react": "^18.2.0"
            }
        });
        let result = resolver(Arc::clone(&lookup))
            .find_candidates(&manifest, &ResolveOptions::default())
            .await
            .unwrap();

        let skipped: Vec<&str> = result.skipped.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(skipped, vec!["local", "mono", "fork"]);
        assert!(result
            .skipped
            .iter()
            .all(|s| s.reason == SkipReason::NonSemverSpecifier));
        assert_eq!(lookup.calls(), vec!["react"]);
        assert_eq!(result.candidates.len(), 1);
    }

    #[tokio::test]
    async fn test_min_age_strategy() {
        let lookup = Arc::new(
            FakeLookup::new()
                .aged("react", Some("19.0.0"))
                .aged("typescript", None),
        );
        let options = ResolveOptions::new(Strategy::MinAge { min_age_days: 7 });
        let result = resolver(Arc::clone(&lookup))
            .find_candidates(&react_manifest(), &options)
            .await
            .unwrap();

        assert_eq!(result.candidates.len(), 1);
        let react = &result.candidates[0];
        assert_eq!(react.target_version, "19.0.0");
        assert_eq!(react.criterion, Criterion::MinAge);
        assert_eq!(react.min_age_days, Some(7));

        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].name, "typescript");
        assert_eq!(
            result.skipped[0].reason,
            SkipReason::NoEligibleTargetForMinAge
        );
        assert_eq!(*lookup.min_age_args.lock().unwrap(), vec![7, 7]);
    }

    #[tokio::test]
    async fn test_min_age_satisfied_range_is_dropped() {
        let lookup = Arc::new(FakeLookup::new().aged("react", Some("18.3.1")));
        let options = ResolveOptions::new(Strategy::MinAge { min_age_days: 30 });
        let result = resolver(lookup)
            .find_candidates(r#"{"dependencies": {"react": "^18.2.0"}}"#, &options)
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_failures_are_isolated() {
        let lookup = Arc::new(
            FakeLookup::new()
                .latest("react", Answer::Version("19.0.1"))
                .latest("ghost", Answer::NotFound)
                .latest("flaky", Answer::Network("connection reset"))
                .latest("odd", Answer::VersionNotFound),
        );
        let manifest = json!({
            "dependencies": {
                "ghost": "^1.0.0",
                "react": "^18.2.0",
                "flaky": "^2.0.0",
                "odd": "^3.0.0"
            }
        });
        let result = resolver(lookup)
            .find_candidates(&manifest, &ResolveOptions::default())
            .await
            .unwrap();

        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.errors.len(), 3);

        let ghost = &result.errors[0];
        assert_eq!(ghost.name, "ghost");
        assert_eq!(ghost.reason, ErrorReason::PackageNotFound);
        assert_eq!(ghost.message, "Package 'ghost' not found");

        let flaky = &result.errors[1];
        assert_eq!(flaky.reason, ErrorReason::NetworkError);
        assert_eq!(flaky.message, "Network error: connection reset");

        let odd = &result.errors[2];
        assert_eq!(odd.reason, ErrorReason::UnknownError);
        assert_eq!(odd.message, "Version 'latest' of package 'odd' not found");
    }

    #[tokio::test]
    async fn test_source_label_is_attached() {
        let lookup = Arc::new(FakeLookup::new().latest("react", Answer::Version("19.0.1")));
        let options = ResolveOptions::default().with_source_label("/app/package.json");
        let manifest = json!({"dependencies": {"react": "^18.2.0", "local": "file:../x"}});
        let result = resolver(lookup)
            .find_candidates(&manifest, &options)
            .await
            .unwrap();
        assert_eq!(
            result.candidates[0].source_label.as_deref(),
            Some("/app/package.json")
        );
        assert_eq!(
            result.skipped[0].source_label.as_deref(),
            Some("/app/package.json")
        );
    }

    #[tokio::test]
    async fn test_same_name_in_both_sections() {
        let lookup = Arc::new(FakeLookup::new().latest("react", Answer::Version("19.0.1")));
        let manifest = json!({
            "dependencies": {"react": "^18.2.0"},
            "devDependencies": {"react": "^17.0.0"}
        });
        let result = resolver(Arc::clone(&lookup))
            .find_candidates(&manifest, &ResolveOptions::default())
            .await
            .unwrap();
        assert_eq!(result.candidates.len(), 2);
        assert_eq!(lookup.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_zero_concurrency_rejected_before_lookups() {
        let lookup = Arc::new(FakeLookup::new());
        let err = resolver(Arc::clone(&lookup))
            .find_candidates(&react_manifest(), &ResolveOptions::default().with_concurrency(0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::InvalidOption {
                option: "concurrency",
                ..
            }
        ));
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_json_fails_whole_call() {
        let lookup = Arc::new(FakeLookup::new());
        let err = resolver(Arc::clone(&lookup))
            .find_candidates(
                "{ not json",
                &ResolveOptions::default().with_source_label("pkg.json"),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Manifest(ManifestError::InvalidJson { .. })
        ));
        assert_eq!(err.to_string(), "Invalid package.json JSON in 'pkg.json'");
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_section_shape_fails_whole_call() {
        let lookup = Arc::new(FakeLookup::new());
        let err = resolver(lookup)
            .find_candidates(
                &json!({"dependencies": {"react": 18}}),
                &ResolveOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Manifest(ManifestError::InvalidShape { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_manifest() {
        let lookup = Arc::new(FakeLookup::new());
        let result = resolver(Arc::clone(&lookup))
            .find_candidates(&json!({"name": "app"}), &ResolveOptions::default())
            .await
            .unwrap();
        assert!(result.is_empty());
        assert!(lookup.calls().is_empty());
    }

    fn wide_manifest(count: usize) -> (Value, FakeLookup) {
        let mut deps = serde_json::Map::new();
        let mut lookup = FakeLookup::new();
        for i in 0..count {
            let name = format!("pkg-{i:02}");
            deps.insert(name.clone(), json!("^1.0.0"));
            let answer = match i % 3 {
                0 => Answer::Version("2.0.0"),
                1 => Answer::Version("1.5.0"),
                _ => Answer::NotFound,
            };
            lookup = lookup.latest(&name, answer);
        }
        (json!({ "dependencies": deps }), lookup)
    }

    #[tokio::test]
    async fn test_concurrency_limit_is_respected() {
        let (manifest, lookup) = wide_manifest(10);
        let lookup = Arc::new(lookup.with_delay(Duration::from_millis(10)));
        resolver(Arc::clone(&lookup))
            .find_candidates(&manifest, &ResolveOptions::default().with_concurrency(3))
            .await
            .unwrap();
        assert_eq!(lookup.max_in_flight.load(Ordering::SeqCst), 3);
        assert_eq!(lookup.calls().len(), 10);
    }

    #[tokio::test]
    async fn test_concurrency_capped_by_dependency_count() {
        let (manifest, lookup) = wide_manifest(4);
        let lookup = Arc::new(lookup.with_delay(Duration::from_millis(10)));
        resolver(Arc::clone(&lookup))
            .find_candidates(&manifest, &ResolveOptions::default().with_concurrency(100))
            .await
            .unwrap();
        assert!(lookup.max_in_flight.load(Ordering::SeqCst) <= 4);
    }

    #[tokio::test]
    async fn test_output_independent_of_concurrency() {
        let mut results = Vec::new();
        for concurrency in [1, 8, 100] {
            let (manifest, lookup) = wide_manifest(12);
            let result = resolver(Arc::new(lookup))
                .find_candidates(
                    &manifest,
                    &ResolveOptions::default().with_concurrency(concurrency),
                )
                .await
                .unwrap();
            results.push(result);
        }
        assert_eq!(results[0], results[1]);
        assert_eq!(results[1], results[2]);

        let names: Vec<&str> = results[0]
            .candidates
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["pkg-00", "pkg-03", "pkg-06", "pkg-09"]);
        assert_eq!(results[0].errors.len(), 4);
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent_after_upgrade() {
        let lookup = Arc::new(FakeLookup::new().latest("react", Answer::Version("19.0.1")));
        let resolver = resolver(lookup);
        let first = resolver
            .find_candidates(
                r#"{"dependencies": {"react": "^18.2.0"}}"#,
                &ResolveOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(first.candidates.len(), 1);

        let second = resolver
            .find_candidates(
                r#"{"dependencies": {"react": "^19.0.1"}}"#,
                &ResolveOptions::default(),
            )
            .await
            .unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn test_strategy_wire_shape() {
        assert_eq!(
            serde_json::to_value(Strategy::Latest).unwrap(),
            json!({"kind": "latest"})
        );
        assert_eq!(
            serde_json::to_value(Strategy::MinAge { min_age_days: 7 }).unwrap(),
            json!({"kind": "minAge", "minAgeDays": 7})
        );
        assert_eq!(Strategy::default(), Strategy::Latest);
    }

    #[test]
    fn test_strategy_from_min_age_days() {
        assert_eq!(Strategy::from_min_age_days(0), Strategy::Latest);
        assert_eq!(
            Strategy::from_min_age_days(14),
            Strategy::MinAge { min_age_days: 14 }
        );
    }
}
