//! # hexcut-cli: Command-Line Interface
//!
//! Provides the `hexcut` command:
//!
//! ```bash
//! hexcut firmware.bin build/cuts 2-4-2 @D@ 8 1024 "mem_%_%_% @" 1
//! hexcut --job cuts.yaml --report build/cuts/report.json
//! ```
//!
//! Positional arguments mirror the fields of [`hexcut_core::JobConfig`];
//! `--job` reads the same settings from a YAML file instead.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; every run decision is made by
//!   `hexcut-core`.
//! - The bank listing is the only thing written to stdout. Diagnostics go
//!   to stderr through `tracing`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser};

use hexcut_core::{parse_ecc_flag, HexcutError, JobConfig, RunReport};

/// Split a flat binary memory image into per-bank hex cut files.
///
/// Writes `<OUTPUT>/main.hex` in address order and one
/// `<OUTPUT>/cutNNN.hex` per bank, then prints one TEMPLATE line per bank
/// (`@` = bank file, `%` = next coordinate, outermost dimension first).
#[derive(Parser, Debug)]
#[command(name = "hexcut", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Read all settings from a YAML job file instead of positional arguments.
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = ["source", "output", "shape", "mode", "width", "height", "template", "ecc"]
    )]
    pub job: Option<PathBuf>,

    /// Write a JSON summary of lines written per bank.
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    #[command(flatten)]
    pub positional: PositionalArgs,
}

/// The eight positional settings, all required unless `--job` is given.
#[derive(Args, Debug)]
pub struct PositionalArgs {
    /// Flat binary memory image.
    #[arg(value_name = "BINPATH", required_unless_present = "job")]
    pub source: Option<PathBuf>,

    /// Existing folder receiving main.hex and the cut files.
    #[arg(value_name = "RESPATH", required_unless_present = "job")]
    pub output: Option<PathBuf>,

    /// Bank counts per dimension, dash separated (e.g. 2-4-2).
    #[arg(value_name = "TENSOR", required_unless_present = "job")]
    pub shape: Option<String>,

    /// One placement symbol per dimension: '@' = MSB, 'D' = LSB.
    #[arg(value_name = "TENSORMODE", required_unless_present = "job")]
    pub mode: Option<String>,

    /// Bytes per line (8 when ECC is enabled).
    #[arg(value_name = "WIDTH", required_unless_present = "job")]
    pub width: Option<usize>,

    /// Rows per bank, a power of two.
    #[arg(value_name = "HEIGHT", required_unless_present = "job")]
    pub height: Option<u64>,

    /// Listing template rendered once per bank.
    #[arg(value_name = "TEMPLATE", required_unless_present = "job")]
    pub template: Option<String>,

    /// Prefix each line with its check code: 0 or 1.
    #[arg(value_name = "ECC", required_unless_present = "job", value_parser = parse_ecc_flag)]
    pub ecc: Option<bool>,
}

impl PositionalArgs {
    /// Collect the positional settings into a job configuration.
    pub fn into_config(self) -> Result<JobConfig> {
        Ok(JobConfig {
            source: self.source.context("missing BINPATH")?,
            output: self.output.context("missing RESPATH")?,
            shape: self.shape.context("missing TENSOR")?,
            mode: self.mode.context("missing TENSORMODE")?,
            width: self.width.context("missing WIDTH")?,
            height: self.height.context("missing HEIGHT")?,
            template: self.template.context("missing TEMPLATE")?,
            ecc: self.ecc.context("missing ECC")?,
        })
    }
}

/// Resolve the job configuration from `--job` or the positional arguments.
pub fn load_config(cli: Cli) -> Result<(JobConfig, Option<PathBuf>)> {
    let config = match cli.job {
        Some(path) => JobConfig::load(&path)
            .with_context(|| format!("failed to load job file {}", path.display()))?,
        None => cli.positional.into_config()?,
    };
    Ok((config, cli.report))
}

/// Execute a run, printing the bank listing to `listing`.
pub fn run<W: Write>(cli: Cli, listing: &mut W) -> Result<RunReport> {
    let (config, report_path) = load_config(cli)?;
    tracing::debug!(?config, "resolved job configuration");

    let job = config
        .into_job()
        .map_err(HexcutError::from)
        .context("invalid configuration")?;
    let report = job.execute(listing)?;

    if let Some(path) = report_path {
        report
            .write_json(&path)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote run report");
    }

    Ok(report)
}

/// Process exit code for a failed run.
///
/// Bad input (configuration, resources, capacity) exits with 1. An internal
/// consistency violation exits with 2.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<HexcutError>() {
        Some(e) if e.is_defect() => 2,
        _ => 1,
    }
}
