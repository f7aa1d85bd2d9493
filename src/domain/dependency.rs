//! Declared dependency information structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// The package.json section a dependency is declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencySection {
    /// `dependencies`
    #[serde(rename = "dependencies")]
    Dependencies,
    /// `devDependencies`
    #[serde(rename = "devDependencies")]
    DevDependencies,
}

impl DependencySection {
    /// Sections in the order they are scanned
    pub const ALL: [DependencySection; 2] = [
        DependencySection::Dependencies,
        DependencySection::DevDependencies,
    ];

    /// The JSON key of this section
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencySection::Dependencies => "dependencies",
            DependencySection::DevDependencies => "devDependencies",
        }
    }
}

impl fmt::Display for DependencySection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dependency as declared in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclaredDependency {
    /// Package name
    pub name: String,
    /// Range string exactly as declared
    pub wanted_range: String,
    /// Section the entry lives in
    pub section: DependencySection,
    /// Where the manifest came from (usually its path)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_label: Option<String>,
}

impl DeclaredDependency {
    /// Creates a new declared dependency
    pub fn new(
        name: impl Into<String>,
        wanted_range: impl Into<String>,
        section: DependencySection,
    ) -> Self {
        Self {
            name: name.into(),
            wanted_range: wanted_range.into(),
            section,
            source_label: None,
        }
    }

    /// Sets the source label (builder pattern)
    pub fn with_source_label(mut self, label: Option<String>) -> Self {
        self.source_label = label;
        self
    }

    /// Key identifying this entry within a manifest
    pub fn key(&self) -> (DependencySection, &str) {
        (self.section, &self.name)
    }
}

impl fmt::Display for DeclaredDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dev_marker = match self.section {
            DependencySection::DevDependencies => " (dev)",
            DependencySection::Dependencies => "",
        };
        write!(f, "{}@{}{}", self.name, self.wanted_range, dev_marker)
    }
}
