//! Registry lookups for package version information
//!
//! This module provides:
//! - The VersionLookup capability consumed by the candidate resolver
//! - HTTP client shared foundation with retry logic
//! - In-memory metadata cache
//! - Pure target selection over fetched metadata
//! - npm registry implementation

mod cache;
mod client;
mod npm;
pub mod select;

pub use cache::{MetadataCache, DEFAULT_CACHE_TTL};
pub use client::{HttpClient, DEFAULT_TIMEOUT, MAX_RETRIES};
pub use npm::NpmRegistry;

use crate::domain::{PackageMetadata, ResolvedVersion};
use crate::error::RegistryError;
use async_trait::async_trait;

/// Asynchronous access to registry version data
#[async_trait]
pub trait VersionLookup: Send + Sync {
    /// Full version metadata of a package
    async fn fetch_metadata(&self, package: &str) -> Result<PackageMetadata, RegistryError>;

    /// Highest eligible version
    async fn latest_eligible(&self, package: &str) -> Result<ResolvedVersion, RegistryError>;

    /// Highest eligible version at least `min_age_days` old, if any
    async fn latest_eligible_at_least(
        &self,
        package: &str,
        min_age_days: u32,
    ) -> Result<Option<ResolvedVersion>, RegistryError>;
}
