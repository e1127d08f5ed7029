//! Veil CLI - Strip metadata and blur sensitive regions before sharing images.
//!
//! Veil removes embedded metadata (camera make, timestamps, GPS position)
//! by re-encoding pixel data, verifies that nothing was left behind, and
//! blurs regions that commonly hold license plates, text, or faces.
//!
//! # Usage
//!
//! ```bash
//! # See what an image gives away
//! veil scan photo.jpg
//!
//! # Strip metadata from one image or a whole directory
//! veil strip photo.jpg
//! veil strip ./photos/ --format jsonl --report report.jsonl
//!
//! # Blur a region
//! veil redact street.jpg --content-type license_plate --intensity heavy
//! veil redact shot.png -t custom --region 10,20,200,80
//!
//! # View configuration
//! veil config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Veil - Strip metadata and blur sensitive regions before sharing images.
#[derive(Parser, Debug)]
#[command(name = "veil")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show an image's metadata and its privacy risk
    Scan(cli::scan::ScanArgs),

    /// Remove metadata from an image or directory and verify the result
    Strip(cli::strip::StripArgs),

    /// Check that an image carries no metadata
    Verify(cli::verify::VerifyArgs),

    /// Blur license plates, text, faces, or a custom region
    Redact(cli::redact::RedactArgs),

    /// Print a redaction preview as a data URI
    Preview(cli::preview::PreviewArgs),

    /// List content types and blur intensities
    Options,

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match veil_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `veil config check`."
            );
            veil_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Veil v{}", veil_core::VERSION);

    match cli.command {
        Commands::Scan(args) => cli::scan::execute(args, config).await,
        Commands::Strip(args) => cli::strip::execute(args, config).await,
        Commands::Verify(args) => cli::verify::execute(args, config).await,
        Commands::Redact(args) => cli::redact::execute(args, config).await,
        Commands::Preview(args) => cli::preview::execute(args, config).await,
        Commands::Options => cli::options::execute(config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_redact_with_negative_region() {
        let cli = Cli::try_parse_from([
            "veil",
            "redact",
            "in.jpg",
            "-t",
            "custom",
            "--region",
            "-5,10,10000,50",
        ])
        .unwrap();
        match cli.command {
            Commands::Redact(args) => {
                let region = args.target.region.unwrap();
                assert_eq!((region.x, region.y, region.width), (-5, 10, 10_000));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_tag_requires_selective() {
        assert!(Cli::try_parse_from(["veil", "strip", "in.jpg", "--tag", "GPSInfo"]).is_err());
        assert!(
            Cli::try_parse_from(["veil", "strip", "in.jpg", "--selective", "--tag", "GPSInfo"])
                .is_ok()
        );
    }
}
