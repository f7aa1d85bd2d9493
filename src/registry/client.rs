//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Exponential backoff retry logic (max 3 retries)
//! - Rate limit error handling

use crate::error::RegistryError;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("pkgbump/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
pub const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, RegistryError> {
        Self::with_config(timeout, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                RegistryError::network("", format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Perform a GET request with retry logic
    ///
    /// Transport failures and 429 responses are retried with exponential
    /// backoff. A 404 maps to `PackageNotFound`; any other non-success
    /// status fails immediately.
    pub async fn get(&self, url: &str, package: &str) -> Result<reqwest::Response, RegistryError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            debug!(url, attempt, "registry request");

            let error = match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::NOT_FOUND {
                        return Err(RegistryError::package_not_found(package));
                    }
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        RegistryError::RateLimited {
                            package: package.to_string(),
                        }
                    } else if !status.is_success() {
                        return Err(RegistryError::network(package, format!("HTTP {}", status)));
                    } else {
                        return Ok(response);
                    }
                }
                Err(e) if e.is_timeout() => RegistryError::timeout(package),
                Err(e) => RegistryError::network(package, e.to_string()),
            };

            if attempt < self.max_retries {
                warn!(url, attempt, error = %error, "registry request failed, retrying");
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay *= 2;
            }
            last_error = Some(error);
        }

        Err(last_error.unwrap_or_else(|| RegistryError::network(package, "unknown error")))
    }

    /// Perform a GET request and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        package: &str,
    ) -> Result<T, RegistryError> {
        let response = self.get(url, package).await?;
        response.json::<T>().await.map_err(|e| {
            warn!(url, error = %e, "failed to decode registry response");
            RegistryError::invalid_response(package, format!("failed to parse JSON: {}", e))
        })
    }
}
