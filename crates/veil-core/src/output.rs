//! Report serialization as JSON or JSON Lines.
//!
//! Single reports are written as one object; batches either as a JSON array
//! or as one object per line, so directory runs can stream results.

use serde::Serialize;
use std::io::{self, Write};

use crate::config::OutputConfig;

/// How reports are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Single JSON object or array
    Json,
    /// One JSON object per line
    JsonLines,
}

impl ReportFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Serializes reports to an underlying writer.
pub struct ReportWriter<W: Write> {
    writer: W,
    format: ReportFormat,
    pretty: bool,
    written: usize,
}

impl<W: Write> ReportWriter<W> {
    /// `pretty` only affects [`ReportFormat::Json`].
    pub fn new(writer: W, format: ReportFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            written: 0,
        }
    }

    /// Build a writer from the `[output]` config section.
    ///
    /// An unrecognized format name falls back to JSON.
    pub fn from_config(writer: W, config: &OutputConfig) -> Self {
        let format = ReportFormat::parse(&config.format).unwrap_or_else(|| {
            tracing::warn!("Unknown output format '{}', using json", config.format);
            ReportFormat::Json
        });
        Self::new(writer, format, config.pretty)
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// Write one report followed by a newline.
    pub fn write<T: Serialize>(&mut self, report: &T) -> io::Result<()> {
        if self.pretty && self.format == ReportFormat::Json {
            serde_json::to_writer_pretty(&mut self.writer, report).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, report).map_err(io::Error::other)?;
        }
        writeln!(self.writer)?;
        self.written += 1;
        Ok(())
    }

    /// Write a batch: a JSON array, or one line per report.
    pub fn write_all<T: Serialize>(&mut self, reports: &[T]) -> io::Result<()> {
        match self.format {
            ReportFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, reports)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, reports).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
                self.written += reports.len();
            }
            ReportFormat::JsonLines => {
                for report in reports {
                    self.write(report)?;
                }
            }
        }
        Ok(())
    }

    /// Number of reports written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
