//! The `veil strip` command: remove metadata from an image or a directory.

mod batch;

use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use veil_core::{Config, OutputFormat, RemovalPolicy, RemovalReport, ReportFormat, Veil};

use super::types::ReportFormatArg;
use batch::strip_batch;

/// Arguments for the `strip` command.
#[derive(Args, Debug)]
pub struct StripArgs {
    /// Image file or directory to sanitize
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file, or output directory for a directory input
    /// (defaults to `<name>.clean.<ext>`, or `<dir>/veil-clean/`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report format (defaults to `output.format` from config)
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormatArg>,

    /// Write reports to this file instead of stdout
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Report removal against a policy instead of counting every tag as removed
    #[arg(long)]
    pub selective: bool,

    /// Policy tag for --selective; repeatable (defaults to `metadata.removal_policy`)
    #[arg(long = "tag", value_name = "TAG", requires = "selective")]
    pub tags: Vec<String>,

    /// Number of parallel workers (defaults to `processing.parallel_workers`)
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// Skip files whose output already exists
    #[arg(long)]
    pub skip_existing: bool,
}

/// One line of a strip report.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(flatten)]
    pub report: Option<RemovalReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Settings resolved from arguments and config, shared by every file.
pub(crate) struct StripContext {
    pub veil: Arc<Veil>,
    pub policy: Option<RemovalPolicy>,
    pub format: ReportFormat,
    pub pretty: bool,
    pub workers: usize,
}

/// Execute the strip command.
pub async fn execute(args: StripArgs, config: Config) -> anyhow::Result<()> {
    super::ensure_exists(&args.input)?;
    let ctx = setup(&args, config);

    if args.input.is_file() {
        return strip_single(&ctx, &args);
    }

    let out_dir = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.join("veil-clean"));
    let discovery = veil_core::FileDiscovery::new(ctx.veil.config().processing.clone());
    let files = discovery.discover(&args.input, Some(&out_dir));
    if files.is_empty() {
        tracing::warn!("No supported image files found at {:?}", args.input);
        return Ok(());
    }
    tracing::info!(
        "Found {} image(s) ({:.1} MB) to sanitize",
        files.len(),
        veil_core::FileDiscovery::total_size(&files) as f64 / 1_000_000.0
    );

    strip_batch(ctx, &args, &out_dir, files).await
}

fn setup(args: &StripArgs, config: Config) -> StripContext {
    let policy = args.selective.then(|| {
        if args.tags.is_empty() {
            config.metadata.removal_policy.clone()
        } else {
            RemovalPolicy::from_tags(args.tags.iter().cloned())
        }
    });
    if let Some(policy) = &policy {
        tracing::info!(
            "Selective removal policy: {}",
            policy.iter().collect::<Vec<_>>().join(", ")
        );
    }
    let format = args.format.map(ReportFormat::from).unwrap_or_else(|| {
        ReportFormat::parse(&config.output.format).unwrap_or(ReportFormat::Json)
    });

    StripContext {
        pretty: config.output.pretty,
        workers: args
            .parallel
            .unwrap_or(config.processing.parallel_workers)
            .max(1),
        policy,
        format,
        veil: Arc::new(Veil::new(config)),
    }
}

fn strip_single(ctx: &StripContext, args: &StripArgs) -> anyhow::Result<()> {
    let format = OutputFormat::from_extension(&super::extension_of(&args.input));
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| super::sibling_output(&args.input, "clean", format.extension()));

    let report = strip_file(&ctx.veil, &args.input, &output, ctx.policy.as_ref());
    let mut writer = super::report_writer(args.report.as_deref(), ctx.format, ctx.pretty)?;
    writer.write(&report)?;
    writer.flush()?;

    if let Some(error) = report.error {
        anyhow::bail!("Failed to strip {:?}: {}", args.input, error);
    }
    Ok(())
}

/// Strip one file and write the clean copy to `output`.
///
/// Failures are captured in the returned report so a batch keeps going.
pub(crate) fn strip_file(
    veil: &Veil,
    input: &Path,
    output: &Path,
    policy: Option<&RemovalPolicy>,
) -> FileReport {
    let result = (|| -> anyhow::Result<RemovalReport> {
        let bytes = std::fs::read(input)?;
        let outcome = veil.strip(&bytes, &super::extension_of(input), policy)?;
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output, &outcome.bytes)?;
        Ok(outcome.report)
    })();

    match result {
        Ok(report) => {
            if !report.verification.success {
                tracing::warn!("{:?}: {}", output, report.verification.message);
            }
            FileReport {
                input: input.to_path_buf(),
                output: Some(output.to_path_buf()),
                report: Some(report),
                error: None,
            }
        }
        Err(e) => {
            tracing::error!("Failed: {:?} - {}", input, e);
            FileReport {
                input: input.to_path_buf(),
                output: None,
                report: None,
                error: Some(e.to_string()),
            }
        }
    }
}
