//! Upgrade workflow coordination
//!
//! This module provides:
//! - Workflow coordination: locate → read → resolve → report → select → confirm → write
//! - JSON report mode and non-interactive `--yes` mode
//! - Dry-run support
//! - Exit code decision from the resolution result

use crate::cli::CliArgs;
use crate::config::{resolve_options, RegistryConfig};
use crate::domain::{ResolutionResult, UpgradeCandidate};
use crate::error::{AppError, ConfigError};
use crate::manifest::{read_manifest, resolve_manifest_path, ManifestWriter, PackageJsonParser};
use crate::output::OutputFormatter;
use crate::progress::Progress;
use crate::prompt::CandidatePrompt;
use crate::registry::{NpmRegistry, VersionLookup};
use crate::update::CandidateResolver;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Exit code for a run that completed but had lookup errors
pub const EXIT_LOOKUP_ERRORS: u8 = 2;

/// How an upgrade run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeOutcome {
    /// The result was printed (JSON mode); nothing was selected or written
    Reported,
    /// Resolution found no candidates
    NoCandidates,
    /// The user selected nothing
    NothingSelected,
    /// The user declined the confirmation
    Canceled,
    /// Selected upgrades were applied (or would have been, in dry-run)
    Applied {
        count: usize,
        path: PathBuf,
        dry_run: bool,
    },
}

/// Everything one run produced
#[derive(Debug, Clone)]
pub struct UpgradeReport {
    pub manifest_path: PathBuf,
    pub result: ResolutionResult,
    pub outcome: UpgradeOutcome,
}

impl UpgradeReport {
    /// 0 on success, 2 when any dependency lookup failed
    pub fn exit_code(&self) -> u8 {
        if self.result.has_errors() {
            EXIT_LOOKUP_ERRORS
        } else {
            0
        }
    }
}

/// Fail unless prompts can be shown
///
/// Interactive runs need both stdin and stdout attached to a terminal.
pub fn ensure_interactive(
    args: &CliArgs,
    stdin_is_terminal: bool,
    stdout_is_terminal: bool,
) -> Result<(), ConfigError> {
    if args.is_interactive() && !(stdin_is_terminal && stdout_is_terminal) {
        return Err(ConfigError::NotInteractive);
    }
    Ok(())
}

/// The `pkgbump` command
pub struct UpgradeCommand {
    args: CliArgs,
    cwd: PathBuf,
    lookup: Arc<dyn VersionLookup>,
}

impl UpgradeCommand {
    /// Create the command backed by the npm registry configured in `args`
    pub fn new(args: CliArgs, cwd: impl Into<PathBuf>) -> Result<Self, AppError> {
        let config = RegistryConfig::from_cli(&args)?;
        debug!(registry = %config.registry_url, "Using npm registry");
        let lookup = Arc::new(NpmRegistry::new(config)?);
        Ok(Self::with_lookup(args, cwd, lookup))
    }

    /// Create the command over a custom lookup (for testing)
    pub fn with_lookup(
        args: CliArgs,
        cwd: impl Into<PathBuf>,
        lookup: Arc<dyn VersionLookup>,
    ) -> Self {
        Self {
            args,
            cwd: cwd.into(),
            lookup,
        }
    }

    /// Run the workflow, writing reports to `out`
    pub async fn run<P: CandidatePrompt>(
        &self,
        prompt: &mut P,
        formatter: &dyn OutputFormatter,
        out: &mut dyn Write,
    ) -> Result<UpgradeReport, AppError> {
        let manifest_path = resolve_manifest_path(self.args.package_json.as_deref(), &self.cwd)?;
        let document = read_manifest(&manifest_path)?;

        let result = self.resolve(&manifest_path, &document).await?;
        debug!(
            path = %manifest_path.display(),
            candidates = result.candidates.len(),
            "Resolved upgrade candidates"
        );

        let outcome = self.decide(&manifest_path, &result, prompt, formatter, out)?;
        formatter.format_outcome(&outcome, out)?;

        Ok(UpgradeReport {
            manifest_path,
            result,
            outcome,
        })
    }

    async fn resolve(
        &self,
        manifest_path: &Path,
        document: &serde_json::Value,
    ) -> Result<ResolutionResult, AppError> {
        let options = resolve_options(&self.args, manifest_path.display().to_string());
        let resolver = CandidateResolver::new(PackageJsonParser::new(), Arc::clone(&self.lookup));

        let mut progress = Progress::new(self.args.show_progress());
        progress.spinner("Checking npm registry for upgrades...");
        let result = resolver.find_candidates(document, &options).await;
        progress.finish_and_clear();

        Ok(result?)
    }

    fn decide<P: CandidatePrompt>(
        &self,
        manifest_path: &Path,
        result: &ResolutionResult,
        prompt: &mut P,
        formatter: &dyn OutputFormatter,
        out: &mut dyn Write,
    ) -> Result<UpgradeOutcome, AppError> {
        if self.args.json {
            formatter.format_result(result, out)?;
            return Ok(UpgradeOutcome::Reported);
        }

        if result.candidates.is_empty() {
            formatter.format_notices(result, out)?;
            return Ok(UpgradeOutcome::NoCandidates);
        }

        let selected: Vec<UpgradeCandidate> = if self.args.yes {
            formatter.format_result(result, out)?;
            result.candidates.clone()
        } else {
            formatter.format_notices(result, out)?;
            out.flush()?;

            let selected = prompt.select(&result.candidates)?;
            if selected.is_empty() {
                return Ok(UpgradeOutcome::NothingSelected);
            }
            if !prompt.confirm_apply(selected.len(), manifest_path)? {
                return Ok(UpgradeOutcome::Canceled);
            }
            selected
        };

        let writer = ManifestWriter::new(self.args.dry_run);
        let count = writer.apply_upgrades(manifest_path, &selected)?;
        debug!(count, dry_run = self.args.dry_run, "Applied upgrades");

        Ok(UpgradeOutcome::Applied {
            count,
            path: manifest_path.to_path_buf(),
            dry_run: self.args.dry_run,
        })
    }
}
