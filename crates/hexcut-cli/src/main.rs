//! # hexcut CLI entry point
//!
//! Parses command-line arguments, initializes tracing on stderr and runs
//! the job. The bank listing is written to stdout.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hexcut_cli::{exit_code_for, run, Cli};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            // Printing help or usage is best effort.
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("hexcut CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let stdout = std::io::stdout();
    let mut listing = stdout.lock();

    match run(cli, &mut listing) {
        Ok(report) => {
            tracing::info!(
                lines = report.lines_written,
                banks = report.lines_per_bank.len(),
                "success"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}
