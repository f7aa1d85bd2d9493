//! JSON output formatter for machine processing
//!
//! Writes the resolution result as `{candidates, skipped, errors}` with
//! camelCase entry fields. Nothing else goes to stdout in JSON mode.

use crate::domain::ResolutionResult;
use crate::orchestrator::UpgradeOutcome;
use crate::output::OutputFormatter;
use std::io::Write;

/// JSON formatter for machine-readable output
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_result(
        &self,
        result: &ResolutionResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(result).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }

    fn format_notices(
        &self,
        _result: &ResolutionResult,
        _writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        Ok(())
    }

    fn format_outcome(
        &self,
        _outcome: &UpgradeOutcome,
        _writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        Ok(())
    }
}
