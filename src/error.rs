//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues with reading, parsing and writing package.json
//! - RegistryError: Issues with package registry lookups
//! - ResolveError: Issues that abort a whole candidate resolution
//! - ConfigError: Issues with CLI configuration

use crate::domain::ErrorReason;
use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Package registry related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Candidate resolution errors
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Terminal interaction errors
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest text is not valid JSON
    #[error("Invalid package.json JSON{}", location(.source_label))]
    InvalidJson {
        source_label: Option<String>,
        #[source]
        source: serde_json::Error,
    },

    /// Root or a dependency section has the wrong shape
    #[error(
        "Invalid {section} section in package.json{}: expected object<string, string>",
        location(.source_label)
    )]
    InvalidShape {
        section: String,
        source_label: Option<String>,
    },

    /// Manifest file not found or not accessible
    #[error("Could not find package.json at '{}'.", .path.display())]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {}: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {}: {source}", .path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest file on disk could not be decoded
    #[error("Invalid package.json at '{}': {source}", .path.display())]
    InvalidManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn location(source_label: &Option<String>) -> String {
    match source_label {
        Some(label) => format!(" in '{}'", label),
        None => String::new(),
    }
}

/// A timestamp literal that is not a valid ISO-8601 date
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid date: {value}")]
pub struct InvalidDateError {
    pub value: String,
}

impl InvalidDateError {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Errors related to package registry lookups
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("Package '{package}' not found")]
    PackageNotFound { package: String },

    /// No version of the package matched the request
    #[error("Version '{version}' of package '{package}' not found")]
    VersionNotFound { package: String, version: String },

    /// Network request failed
    #[error("Network error: {message}")]
    Network { package: String, message: String },

    /// Request timed out
    #[error("Network error: timeout while fetching '{package}'")]
    Timeout { package: String },

    /// Rate limit exceeded
    #[error("Network error: rate limit exceeded while fetching '{package}'")]
    RateLimited { package: String },

    /// Invalid response from registry
    #[error("invalid registry response for '{package}': {message}")]
    InvalidResponse { package: String, message: String },

    /// Publish time could not be interpreted
    #[error(transparent)]
    InvalidDate(#[from] InvalidDateError),
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
        }
    }

    /// Creates a new VersionNotFound error
    pub fn version_not_found(package: impl Into<String>, version: impl Into<String>) -> Self {
        RegistryError::VersionNotFound {
            package: package.into(),
            version: version.into(),
        }
    }

    /// Creates a new Network error
    pub fn network(package: impl Into<String>, message: impl Into<String>) -> Self {
        RegistryError::Network {
            package: package.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(package: impl Into<String>, message: impl Into<String>) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            message: message.into(),
        }
    }

    /// HTTP-like status code describing the failure
    pub fn status_code(&self) -> u16 {
        match self {
            RegistryError::PackageNotFound { .. } | RegistryError::VersionNotFound { .. } => 404,
            RegistryError::Network { .. } | RegistryError::Timeout { .. } => 503,
            RegistryError::RateLimited { .. } => 429,
            RegistryError::InvalidResponse { .. } | RegistryError::InvalidDate(_) => 500,
        }
    }

    /// Classifies the failure for a candidate error entry
    pub fn reason(&self) -> ErrorReason {
        match self {
            RegistryError::PackageNotFound { .. } => ErrorReason::PackageNotFound,
            RegistryError::Network { .. }
            | RegistryError::Timeout { .. }
            | RegistryError::RateLimited { .. } => ErrorReason::NetworkError,
            _ => ErrorReason::UnknownError,
        }
    }

    /// Returns true for failures worth retrying at the transport level
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RegistryError::Network { .. }
                | RegistryError::Timeout { .. }
                | RegistryError::RateLimited { .. }
        )
    }
}

/// Errors that abort a whole candidate resolution
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Caller-supplied option is out of range
    #[error("Invalid upgrade candidate option '{option}': {reason}")]
    InvalidOption {
        option: &'static str,
        reason: String,
    },

    /// Manifest content could not be parsed
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

impl ResolveError {
    /// Creates a new InvalidOption error
    pub fn invalid_option(option: &'static str, reason: impl Into<String>) -> Self {
        ResolveError::InvalidOption {
            option,
            reason: reason.into(),
        }
    }
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Interactive mode without a terminal
    #[error("This command requires an interactive terminal. Re-run in a TTY session.")]
    NotInteractive,

    /// Empty --package-json value
    #[error("--package-json requires a non-empty path")]
    EmptyPath,

    /// Registry URL is unusable
    #[error("invalid registry URL '{value}': {message}")]
    InvalidRegistryUrl { value: String, message: String },
}
