//! package.json parser
//!
//! Handles:
//! - dependencies
//! - devDependencies
//!
//! Entries come out in file order, `dependencies` first.

use crate::domain::{DeclaredDependency, DependencySection};
use crate::error::ManifestError;
use serde_json::{Map, Value};

const ROOT_SECTION: &str = "package.json root";

/// Options for a single parse
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Carried on every entry and used in error messages
    pub source_label: Option<String>,
}

impl ParseOptions {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            source_label: Some(label.into()),
        }
    }
}

/// Parser for package.json documents
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageJsonParser;

impl PackageJsonParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse declared dependencies from a decoded document
    pub fn parse_value(
        &self,
        document: &Value,
        options: &ParseOptions,
    ) -> Result<Vec<DeclaredDependency>, ManifestError> {
        let root = document
            .as_object()
            .ok_or_else(|| invalid_shape(ROOT_SECTION, options))?;

        let mut dependencies = Vec::new();
        for section in DependencySection::ALL {
            let Some(entries) = root.get(section.as_str()) else {
                continue;
            };
            let entries = entries
                .as_object()
                .ok_or_else(|| invalid_shape(section.as_str(), options))?;
            parse_section(entries, section, options, &mut dependencies)?;
        }

        Ok(dependencies)
    }

    /// Parse declared dependencies from JSON text
    pub fn parse_str(
        &self,
        content: &str,
        options: &ParseOptions,
    ) -> Result<Vec<DeclaredDependency>, ManifestError> {
        let document: Value =
            serde_json::from_str(content).map_err(|e| ManifestError::InvalidJson {
                source_label: options.source_label.clone(),
                source: e,
            })?;
        self.parse_value(&document, options)
    }
}

fn parse_section(
    entries: &Map<String, Value>,
    section: DependencySection,
    options: &ParseOptions,
    output: &mut Vec<DeclaredDependency>,
) -> Result<(), ManifestError> {
    for (name, range) in entries {
        let range = range
            .as_str()
            .ok_or_else(|| invalid_shape(section.as_str(), options))?;
        output.push(
            DeclaredDependency::new(name.clone(), range, section)
                .with_source_label(options.source_label.clone()),
        );
    }
    Ok(())
}

fn invalid_shape(section: &str, options: &ParseOptions) -> ManifestError {
    ManifestError::InvalidShape {
        section: section.to_string(),
        source_label: options.source_label.clone(),
    }
}
