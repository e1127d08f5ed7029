//! CLI enum types shared by several commands.

use clap::ValueEnum;
use veil_core::{Intensity, ReportFormat};

/// Report layout on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReportFormatArg {
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<ReportFormatArg> for ReportFormat {
    fn from(arg: ReportFormatArg) -> Self {
        match arg {
            ReportFormatArg::Json => ReportFormat::Json,
            ReportFormatArg::Jsonl => ReportFormat::JsonLines,
        }
    }
}

impl std::fmt::Display for ReportFormatArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormatArg::Json => write!(f, "json"),
            ReportFormatArg::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Blur strength.
#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum IntensityArg {
    /// Subtle blur
    Light,
    /// Balanced blur (default)
    #[default]
    Medium,
    /// Content fully obscured
    Heavy,
}

impl From<IntensityArg> for Intensity {
    fn from(arg: IntensityArg) -> Self {
        match arg {
            IntensityArg::Light => Intensity::Light,
            IntensityArg::Medium => Intensity::Medium,
            IntensityArg::Heavy => Intensity::Heavy,
        }
    }
}
