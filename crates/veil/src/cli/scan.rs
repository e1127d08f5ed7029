//! The `veil scan` command: show an image's metadata and what it reveals.

use clap::Args;
use std::path::PathBuf;
use veil_core::{Config, Veil};

/// Arguments for the `scan` command.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Image file to inspect
    #[arg(required = true)]
    pub input: PathBuf,

    /// Print compact JSON instead of pretty JSON
    #[arg(long)]
    pub compact: bool,
}

/// Execute the scan command.
pub async fn execute(args: ScanArgs, config: Config) -> anyhow::Result<()> {
    super::ensure_exists(&args.input)?;
    let veil = Veil::new(config);

    let bytes = std::fs::read(&args.input)?;
    let report = veil.scan(&bytes)?;
    tracing::info!(
        "{}: {} metadata item(s), {} risk",
        args.input.display(),
        report.sensitivity.metadata_count,
        report.sensitivity.overall_risk
    );

    let json = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{json}");
    Ok(())
}
