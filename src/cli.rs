//! CLI argument parsing module for pkgbump

use crate::config::DEFAULT_REGISTRY_URL;
use crate::update::DEFAULT_CONCURRENCY;
use clap::Parser;
use std::path::PathBuf;

/// Parse --min-age-days: a whole number of days, zero or more
fn parse_min_age_days(s: &str) -> Result<u32, String> {
    s.trim()
        .parse::<u32>()
        .map_err(|_| "--min-age-days must be an integer >= 0".to_string())
}

/// Parse --concurrency: at least one lookup in flight
fn parse_concurrency(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err("--concurrency must be an integer >= 1".to_string()),
    }
}

/// Parse --package-json: any non-blank path
fn parse_package_json(s: &str) -> Result<PathBuf, String> {
    if s.trim().is_empty() {
        return Err("--package-json requires a non-empty path".to_string());
    }
    Ok(PathBuf::from(s))
}

/// Interactive package.json dependency upgrader
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pkgbump",
    version,
    about = "Interactive package.json dependency upgrader"
)]
pub struct CliArgs {
    /// Path to package.json, relative to the current directory
    #[arg(short = 'p', long = "package-json", value_name = "PATH", value_parser = parse_package_json)]
    pub package_json: Option<PathBuf>,

    // Target selection
    /// Only offer versions published at least this many days ago (0 = latest)
    #[arg(short = 'm', long, value_name = "DAYS", default_value_t = 0, value_parser = parse_min_age_days)]
    pub min_age_days: u32,

    /// Maximum registry lookups in flight
    #[arg(short = 'c', long, value_name = "N", default_value_t = DEFAULT_CONCURRENCY, value_parser = parse_concurrency)]
    pub concurrency: usize,

    /// Allow prerelease versions as targets
    #[arg(long)]
    pub include_prerelease: bool,

    /// Allow deprecated versions as targets
    #[arg(long)]
    pub include_deprecated: bool,

    // Registry
    /// npm registry base URL
    #[arg(long, value_name = "URL", env = "NPM_REGISTRY_URL", default_value = DEFAULT_REGISTRY_URL)]
    pub registry_url: String,

    /// Registry request timeout in milliseconds
    #[arg(long, value_name = "MS", env = "NPM_TIMEOUT", default_value_t = 30_000)]
    pub timeout_ms: u64,

    /// Registry metadata cache lifetime in milliseconds
    #[arg(long, value_name = "MS", env = "NPM_CACHE_TTL", default_value_t = 300_000)]
    pub cache_ttl_ms: u64,

    // Output and workflow
    /// Print the resolution result as JSON and exit without changes
    #[arg(long)]
    pub json: bool,

    /// Apply every candidate without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Dry run mode - show what would be updated without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable quiet mode - no progress spinner
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose output (debug logging)
    #[arg(long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Returns true if the run needs a terminal for prompts
    pub fn is_interactive(&self) -> bool {
        !self.json && !self.yes
    }

    /// Returns true if the progress spinner should be drawn
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}
