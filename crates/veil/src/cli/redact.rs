//! The `veil redact` command: blur sensitive regions of an image.

use clap::Args;
use std::path::PathBuf;
use veil_core::{Config, ContentType, CustomRect, Intensity, OutputFormat, Target, Veil};

use super::types::IntensityArg;

/// What to blur and how strongly. Shared with `veil preview`.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Content to blur: license_plate, text, face or custom
    /// (unrecognized names are treated as text)
    #[arg(short = 't', long = "content-type", default_value = "text")]
    pub content_type: String,

    /// Blur intensity
    #[arg(short, long, value_enum, default_value = "medium")]
    pub intensity: IntensityArg,

    /// Rectangle for `custom`, as x,y,width,height (clamped to the image)
    #[arg(long, value_parser = parse_region, allow_hyphen_values = true)]
    pub region: Option<CustomRect>,
}

impl TargetArgs {
    pub fn target(&self) -> anyhow::Result<Target> {
        let content = ContentType::parse_lenient(&self.content_type);
        Ok(Target::from_content_type(content, self.region)?)
    }

    pub fn intensity(&self) -> Intensity {
        self.intensity.into()
    }
}

/// Parse `x,y,width,height`.
pub fn parse_region(s: &str) -> Result<CustomRect, String> {
    let parts: Vec<i64> = s
        .split(',')
        .map(|p| p.trim().parse::<i64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid region '{s}': {e}"))?;
    match parts.as_slice() {
        [x, y, width, height] => Ok(CustomRect::new(*x, *y, *width, *height)),
        _ => Err(format!(
            "invalid region '{s}': expected x,y,width,height"
        )),
    }
}

/// Arguments for the `redact` command.
#[derive(Args, Debug)]
pub struct RedactArgs {
    /// Image file to redact
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file (defaults to `<name>.redacted.<ext>` beside the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub target: TargetArgs,
}

/// Execute the redact command.
pub async fn execute(args: RedactArgs, config: Config) -> anyhow::Result<()> {
    super::ensure_exists(&args.input)?;
    let target = args.target.target()?;
    let intensity = args.target.intensity();
    let veil = Veil::new(config);

    let bytes = std::fs::read(&args.input)?;
    let decoded = veil.decode(&bytes)?;
    let redacted = veil.redact(decoded.image, &target, intensity)?;

    let format = OutputFormat::from_extension(&super::extension_of(&args.input));
    let output = args
        .output
        .unwrap_or_else(|| super::sibling_output(&args.input, "redacted", format.extension()));
    std::fs::write(&output, veil.encode(&redacted, format)?)?;

    tracing::info!(
        "Redacted {} ({}, {}) -> {:?}",
        args.input.display(),
        target.content_type(),
        intensity,
        output
    );
    println!("{}", output.display());
    Ok(())
}
