//! pkgbump - Interactive package.json dependency upgrader library
//!
//! The core is the upgrade candidate resolver in [`update`]: given a
//! package.json and a registry lookup it sorts every declared dependency
//! into candidates, skipped entries and lookup errors. Around it:
//! - [`manifest`]: locating, parsing and rewriting package.json
//! - [`registry`]: npm registry lookups with retry and caching
//! - [`prompt`] and [`output`]: terminal selection and reporting
//! - [`orchestrator`]: the end-to-end upgrade workflow

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod prompt;
pub mod registry;
pub mod update;
