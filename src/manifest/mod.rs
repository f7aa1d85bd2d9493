//! package.json handling
//!
//! This module provides functionality to:
//! - Locate and read the target package.json
//! - Parse declared dependencies from it
//! - Rewrite selected dependency ranges in place

mod locator;
mod package_json;
mod writer;

pub use locator::{read_manifest, resolve_manifest_path, PACKAGE_JSON};
pub use package_json::{PackageJsonParser, ParseOptions};
pub use writer::{apply_to_value, rewrite_range, ManifestWriter};
