//! npm registry lookup
//!
//! Fetches package metadata from the npm registry and selects upgrade
//! targets from it.
//! API endpoint: {registry_url}/{package}

use crate::config::RegistryConfig;
use crate::domain::{PackageMetadata, ResolvedVersion, VersionMetadata};
use crate::error::RegistryError;
use crate::registry::select::{latest_eligible, latest_eligible_at_least};
use crate::registry::{HttpClient, MetadataCache, VersionLookup};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// npm package document (only the parts used here)
#[derive(Debug, Deserialize)]
struct NpmPackageResponse {
    #[serde(default)]
    versions: IndexMap<String, NpmVersionResponse>,
    /// Publish times keyed by version, plus `created` / `modified`
    #[serde(default)]
    time: IndexMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct NpmVersionResponse {
    #[serde(default)]
    deprecated: Option<Value>,
}

impl From<NpmPackageResponse> for PackageMetadata {
    fn from(response: NpmPackageResponse) -> Self {
        let versions = response
            .versions
            .into_iter()
            .map(|(version, meta)| {
                let deprecated = match meta.deprecated {
                    Some(Value::String(message)) => Some(message),
                    Some(Value::Bool(true)) => Some(String::new()),
                    _ => None,
                };
                (version, VersionMetadata { deprecated })
            })
            .collect();

        let publish_times = response
            .time
            .into_iter()
            .filter(|(key, _)| key != "created" && key != "modified")
            .filter_map(|(key, value)| match value {
                Value::String(time) => Some((key, time)),
                _ => None,
            })
            .collect();

        PackageMetadata {
            versions,
            publish_times,
        }
    }
}

/// Registry lookup backed by the npm HTTP API
pub struct NpmRegistry {
    client: HttpClient,
    config: RegistryConfig,
    cache: MetadataCache,
    /// Fixed reference time for ages; `None` means now
    reference_time: Option<DateTime<Utc>>,
}

impl NpmRegistry {
    /// Create a new npm registry lookup
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        let client = HttpClient::with_timeout(config.timeout)?.with_max_retries(config.max_retries);
        Ok(Self::with_client(client, config))
    }

    /// Create a lookup over an existing HTTP client
    pub fn with_client(client: HttpClient, config: RegistryConfig) -> Self {
        Self {
            client,
            cache: MetadataCache::new(config.cache_ttl),
            config,
            reference_time: None,
        }
    }

    /// Compute ages against a fixed time instead of now (for testing)
    pub fn with_time(mut self, reference: DateTime<Utc>) -> Self {
        self.reference_time = Some(reference);
        self
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!(
            "{}/{}",
            self.config.registry_url,
            encode_package_name(package)
        )
    }

    fn reference(&self) -> DateTime<Utc> {
        self.reference_time.unwrap_or_else(Utc::now)
    }

    async fn metadata(&self, package: &str) -> Result<Arc<PackageMetadata>, RegistryError> {
        if let Some(cached) = self.cache.get(package).await {
            debug!(package, "metadata cache hit");
            return Ok(cached);
        }

        let url = self.build_url(package);
        let response: NpmPackageResponse = self.client.get_json(&url, package).await?;
        let metadata = Arc::new(PackageMetadata::from(response));
        debug!(package, versions = metadata.versions.len(), "fetched metadata");

        self.cache.insert(package, Arc::clone(&metadata)).await;
        Ok(metadata)
    }
}

/// Scoped package: @scope/name -> @scope%2Fname
fn encode_package_name(package: &str) -> String {
    if package.starts_with('@') {
        package.replace('/', "%2F")
    } else {
        package.to_string()
    }
}

#[async_trait]
impl VersionLookup for NpmRegistry {
    async fn fetch_metadata(&self, package: &str) -> Result<PackageMetadata, RegistryError> {
        let metadata = self.metadata(package).await?;
        Ok(PackageMetadata::clone(&metadata))
    }

    async fn latest_eligible(&self, package: &str) -> Result<ResolvedVersion, RegistryError> {
        let metadata = self.metadata(package).await?;
        latest_eligible(package, &metadata, &self.config.filter, self.reference())
    }

    async fn latest_eligible_at_least(
        &self,
        package: &str,
        min_age_days: u32,
    ) -> Result<Option<ResolvedVersion>, RegistryError> {
        let metadata = self.metadata(package).await?;
        latest_eligible_at_least(
            &metadata,
            &self.config.filter,
            min_age_days,
            self.reference(),
        )
    }
}
