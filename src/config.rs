//! Runtime configuration derived from CLI arguments

use crate::cli::CliArgs;
use crate::error::ConfigError;
use crate::registry::{DEFAULT_CACHE_TTL, DEFAULT_TIMEOUT, MAX_RETRIES};
use crate::update::{ResolveOptions, Strategy, VersionFilter};
use std::time::Duration;

/// Public npm registry
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Settings for the npm registry client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Base URL without a trailing slash
    pub registry_url: String,
    pub timeout: Duration,
    pub cache_ttl: Duration,
    pub max_retries: u32,
    pub filter: VersionFilter,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            max_retries: MAX_RETRIES,
            filter: VersionFilter::default(),
        }
    }
}

impl RegistryConfig {
    /// Config pointing at `registry_url` with default settings otherwise
    pub fn with_url(registry_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            registry_url: normalize_registry_url(registry_url)?,
            ..Self::default()
        })
    }

    /// Set the version filter (builder pattern)
    pub fn with_filter(mut self, filter: VersionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the number of retries (builder pattern)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Build the registry settings from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, ConfigError> {
        Ok(Self {
            registry_url: normalize_registry_url(&args.registry_url)?,
            timeout: Duration::from_millis(args.timeout_ms),
            cache_ttl: Duration::from_millis(args.cache_ttl_ms),
            max_retries: MAX_RETRIES,
            filter: VersionFilter::new()
                .with_prerelease(args.include_prerelease)
                .with_deprecated(args.include_deprecated),
        })
    }
}

/// Resolution options from CLI arguments
pub fn resolve_options(args: &CliArgs, source_label: impl Into<String>) -> ResolveOptions {
    ResolveOptions::new(Strategy::from_min_age_days(args.min_age_days))
        .with_source_label(source_label)
        .with_concurrency(args.concurrency)
}

fn normalize_registry_url(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidRegistryUrl {
            value: value.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidRegistryUrl {
            value: value.to_string(),
            message: "must start with http:// or https://".to_string(),
        });
    }
    Ok(trimmed.to_string())
}
