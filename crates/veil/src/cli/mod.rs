//! Command implementations.

pub mod config;
pub mod options;
pub mod preview;
pub mod redact;
pub mod scan;
pub mod strip;
pub mod types;
pub mod verify;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use veil_core::{ReportFormat, ReportWriter};

/// Open a report writer on `path`, or stdout when no path is given.
pub(crate) fn report_writer(
    path: Option<&Path>,
    format: ReportFormat,
    pretty: bool,
) -> anyhow::Result<ReportWriter<Box<dyn Write + Send>>> {
    let sink: Box<dyn Write + Send> = match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };
    Ok(ReportWriter::new(sink, format, pretty))
}

/// Fail early with a hint when an input path is missing.
pub(crate) fn ensure_exists(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!(
            "Input path does not exist: {:?}\n\n  Hint: Check the file path and try again.",
            path
        );
    }
    Ok(())
}

/// Lowercase extension of `path`, or an empty string.
pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

/// `photo.jpg` → `photo.<suffix>.<ext>` beside the input.
pub(crate) fn sibling_output(input: &Path, suffix: &str, ext: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{stem}.{suffix}.{ext}"))
}
