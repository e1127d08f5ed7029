//! The `veil preview` command: print a redaction as an inline data URI.

use clap::Args;
use std::path::PathBuf;
use veil_core::{Config, Veil};

use super::redact::TargetArgs;

/// Arguments for the `preview` command.
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Image file to preview
    #[arg(required = true)]
    pub input: PathBuf,

    #[command(flatten)]
    pub target: TargetArgs,

    /// Directory for scratch files (overrides `preview.scratch_dir`)
    #[arg(long)]
    pub scratch_dir: Option<PathBuf>,
}

/// Execute the preview command.
pub async fn execute(args: PreviewArgs, mut config: Config) -> anyhow::Result<()> {
    super::ensure_exists(&args.input)?;
    if let Some(dir) = args.scratch_dir {
        config.preview.scratch_dir = Some(dir);
    }
    let target = args.target.target()?;
    let veil = Veil::new(config);

    let bytes = std::fs::read(&args.input)?;
    let decoded = veil.decode(&bytes)?;
    let uri = veil.preview(&decoded.image, &target, args.target.intensity())?;

    tracing::debug!("Preview data URI is {} bytes", uri.len());
    println!("{uri}");
    Ok(())
}
