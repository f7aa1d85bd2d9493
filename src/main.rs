//! pkgbump - Interactive package.json dependency upgrader
//!
//! Finds dependencies whose newest eligible npm release lies outside the
//! declared range, lets the user pick which to bump and rewrites
//! package.json in place.

use clap::Parser;
use pkgbump::cli::CliArgs;
use pkgbump::orchestrator::{ensure_interactive, UpgradeCommand};
use pkgbump::output::{create_formatter, OutputConfig};
use pkgbump::prompt::TerminalPrompt;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; RUST_LOG wins over --verbose
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let stdout_is_terminal = io::stdout().is_terminal();
    ensure_interactive(&args, io::stdin().is_terminal(), stdout_is_terminal)?;

    let cwd = std::env::current_dir()?;
    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet, args.dry_run)
        .with_color(stdout_is_terminal);
    let color = output_config.color;
    let formatter = create_formatter(output_config);

    let command = UpgradeCommand::new(args, cwd)?;
    let mut prompt = TerminalPrompt::new(io::stdin().lock(), io::stdout()).with_color(color);
    let mut stdout = io::stdout();
    let report = command
        .run(&mut prompt, formatter.as_ref(), &mut stdout)
        .await?;
    stdout.flush()?;

    Ok(ExitCode::from(report.exit_code()))
}
