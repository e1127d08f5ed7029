//! The `veil verify` command: check that an image carries no metadata.

use clap::Args;
use std::path::PathBuf;
use veil_core::{Config, Veil};

/// Arguments for the `verify` command.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Image file to verify
    #[arg(required = true)]
    pub input: PathBuf,
}

/// Execute the verify command.
///
/// Prints the report and fails when metadata remains.
pub async fn execute(args: VerifyArgs, config: Config) -> anyhow::Result<()> {
    super::ensure_exists(&args.input)?;
    let veil = Veil::new(config);

    let bytes = std::fs::read(&args.input)?;
    let report = veil.verify(&bytes);
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.success {
        anyhow::bail!("{}: {}", args.input.display(), report.message);
    }
    Ok(())
}
