//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Upgrade candidate display with colors
//! - Semantic version change type indication (major/minor/patch)
//! - Skipped dependency and lookup error sections
//! - Final outcome messages

use crate::domain::{CandidateError, ResolutionResult, SkippedDependency, UpgradeCandidate};
use crate::orchestrator::UpgradeOutcome;
use crate::output::{OutputFormatter, Verbosity};
use crate::update::parse_range;
use colored::Colorize;
use node_semver::Version;
use std::io::Write;

/// Semantic version change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionChangeType {
    /// Major version change (breaking)
    Major,
    /// Minor version change (features)
    Minor,
    /// Patch version change (fixes)
    Patch,
    /// Unknown or unparseable
    Unknown,
}

impl VersionChangeType {
    /// Determine the change type between a declared range and a target version
    ///
    /// The baseline is the lowest version the range admits.
    pub fn from_versions(range: &str, target: &str) -> Self {
        let baseline = parse_range(range).and_then(|range| range.min_version());
        let target = Version::parse(target).ok();

        match (baseline, target) {
            (Some(old), Some(new)) => {
                if new.major != old.major {
                    VersionChangeType::Major
                } else if new.minor != old.minor {
                    VersionChangeType::Minor
                } else {
                    VersionChangeType::Patch
                }
            }
            _ => VersionChangeType::Unknown,
        }
    }

    /// Get the display label with color
    pub fn colored_label(&self) -> String {
        match self {
            VersionChangeType::Major => "major".red().bold().to_string(),
            VersionChangeType::Minor => "minor".yellow().to_string(),
            VersionChangeType::Patch => "patch".green().to_string(),
            VersionChangeType::Unknown => "?".dimmed().to_string(),
        }
    }

    /// Get the plain label
    pub fn label(&self) -> &'static str {
        match self {
            VersionChangeType::Major => "major",
            VersionChangeType::Minor => "minor",
            VersionChangeType::Patch => "patch",
            VersionChangeType::Unknown => "?",
        }
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether this is a dry-run
    dry_run: bool,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity, dry_run: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, dry_run: bool, color: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color,
        }
    }

    /// Get the dry-run prefix if applicable
    fn dry_run_prefix(&self) -> String {
        if self.dry_run {
            if self.color {
                format!("{} ", "(dry-run)".cyan())
            } else {
                "(dry-run) ".to_string()
            }
        } else {
            String::new()
        }
    }

    fn heading(&self, text: &str, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.color {
            writeln!(writer, "{}", text.bold())
        } else {
            writeln!(writer, "{}", text)
        }
    }

    fn format_candidate_line(
        &self,
        candidate: &UpgradeCandidate,
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let change_type =
            VersionChangeType::from_versions(&candidate.wanted_range, &candidate.target_version);

        if self.color {
            let name_display = format!("{:width$}", candidate.name, width = max_name_len);
            writeln!(
                writer,
                "  {} {} {} {} [{}] {}",
                name_display,
                candidate.wanted_range.dimmed(),
                "→".dimmed(),
                candidate.target_version.bright_white().bold(),
                change_type.colored_label(),
                candidate.section.to_string().dimmed()
            )
        } else {
            writeln!(
                writer,
                "  {:width$} {} -> {} [{}] {}",
                candidate.name,
                candidate.wanted_range,
                candidate.target_version,
                change_type.label(),
                candidate.section,
                width = max_name_len
            )
        }
    }

    fn format_skipped(
        &self,
        skipped: &[SkippedDependency],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if skipped.is_empty() || self.verbosity == Verbosity::Quiet {
            return Ok(());
        }

        if self.verbosity != Verbosity::Verbose {
            let line = format!(
                "Skipped {} {} (use --verbose to list)",
                skipped.len(),
                plural(skipped.len(), "dependency", "dependencies")
            );
            if self.color {
                writeln!(writer, "{}", line.dimmed())?;
            } else {
                writeln!(writer, "{}", line)?;
            }
            return Ok(());
        }

        self.heading("Skipped:", writer)?;
        let width = skipped.iter().map(|s| s.name.len()).max().unwrap_or(0);
        for entry in skipped {
            let line = format!(
                "  {:width$} {} ({}, {})",
                entry.name,
                entry.wanted_range,
                entry.reason,
                entry.section,
                width = width
            );
            if self.color {
                writeln!(writer, "{}", line.dimmed())?;
            } else {
                writeln!(writer, "{}", line)?;
            }
        }
        Ok(())
    }

    fn format_errors(
        &self,
        errors: &[CandidateError],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if errors.is_empty() {
            return Ok(());
        }

        if self.color {
            writeln!(writer, "{}", "Lookup errors:".red().bold())?;
        } else {
            writeln!(writer, "Lookup errors:")?;
        }
        for error in errors {
            if self.color {
                writeln!(
                    writer,
                    "  {} {}: {}",
                    error.name.red(),
                    format!("({})", error.reason).dimmed(),
                    error.message
                )?;
            } else {
                writeln!(
                    writer,
                    "  {} ({}): {}",
                    error.name, error.reason, error.message
                )?;
            }
        }
        Ok(())
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

impl OutputFormatter for TextFormatter {
    fn format_result(
        &self,
        result: &ResolutionResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if !result.candidates.is_empty() {
            let count = result.candidates.len();
            self.heading(
                &format!(
                    "{}{} upgrade {}",
                    self.dry_run_prefix(),
                    count,
                    plural(count, "candidate", "candidates")
                ),
                writer,
            )?;
            let width = result
                .candidates
                .iter()
                .map(|c| c.name.len())
                .max()
                .unwrap_or(0)
                .max(20);
            for candidate in &result.candidates {
                self.format_candidate_line(candidate, width, writer)?;
            }
        }

        self.format_notices(result, writer)
    }

    fn format_notices(
        &self,
        result: &ResolutionResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        self.format_skipped(&result.skipped, writer)?;
        self.format_errors(&result.errors, writer)
    }

    fn format_outcome(
        &self,
        outcome: &UpgradeOutcome,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        match outcome {
            UpgradeOutcome::Reported => Ok(()),
            UpgradeOutcome::NoCandidates => {
                writeln!(writer, "No eligible packages found to upgrade.")
            }
            UpgradeOutcome::NothingSelected => {
                writeln!(writer, "No packages selected. No changes made.")
            }
            UpgradeOutcome::Canceled => writeln!(writer, "Upgrade canceled. No changes made."),
            UpgradeOutcome::Applied {
                count,
                path,
                dry_run,
            } => {
                let noun = plural(*count, "dependency", "dependencies");
                if *dry_run {
                    writeln!(
                        writer,
                        "{}Would update {} {} in {}.",
                        self.dry_run_prefix(),
                        count,
                        noun,
                        path.display()
                    )
                } else if self.color {
                    writeln!(
                        writer,
                        "{} {} {} in {}.",
                        "Updated".green(),
                        count,
                        noun,
                        path.display()
                    )
                } else {
                    writeln!(writer, "Updated {} {} in {}.", count, noun, path.display())
                }
            }
        }
    }
}
