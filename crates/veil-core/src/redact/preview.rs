//! Inline previews of a redaction as JPEG data URIs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::DynamicImage;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use crate::config::{EncodeConfig, PreviewConfig};
use crate::error::{SanitizeError, SanitizeResult};
use crate::pipeline::encode::{encode_rgb, flatten_to_rgb, OutputFormat};

use super::blur::Intensity;
use super::engine::RegionRedactor;
use super::region::Target;

/// Renders a redaction into a `data:image/jpeg;base64,...` string.
///
/// Each call stages the encoded preview in its own scratch file, which is
/// removed when the call returns, whether it succeeded or not. The caller's
/// image is never modified.
pub struct PreviewAdapter {
    redactor: RegionRedactor,
    scratch_dir: Option<PathBuf>,
    encode: EncodeConfig,
}

impl PreviewAdapter {
    pub fn new(redactor: RegionRedactor, config: &PreviewConfig) -> Self {
        Self {
            redactor,
            scratch_dir: config.scratch_dir.clone(),
            encode: EncodeConfig {
                jpeg_quality: config.jpeg_quality,
                ..EncodeConfig::default()
            },
        }
    }

    /// Stage scratch files in `dir` instead of the system temp directory.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn preview(
        &self,
        image: &DynamicImage,
        target: &Target,
        intensity: Intensity,
    ) -> SanitizeResult<String> {
        let mut scratch = self.scratch_file()?;

        let redacted = self.redactor.redact(image.clone(), target, intensity)?;
        let jpeg = encode_rgb(&flatten_to_rgb(&redacted), OutputFormat::Jpeg, &self.encode)?;

        let io_err = |e: std::io::Error| SanitizeError::encode("jpeg", format!("scratch file: {e}"));
        scratch.write_all(&jpeg).map_err(io_err)?;
        scratch.flush().map_err(io_err)?;
        scratch.seek(SeekFrom::Start(0)).map_err(io_err)?;

        let mut payload = Vec::with_capacity(jpeg.len());
        scratch.read_to_end(&mut payload).map_err(io_err)?;

        tracing::debug!(
            "Preview rendered ({} bytes) via {}",
            payload.len(),
            scratch.path().display()
        );
        Ok(format!(
            "data:{};base64,{}",
            OutputFormat::Jpeg.mime_type(),
            STANDARD.encode(payload)
        ))
    }

    fn scratch_file(&self) -> SanitizeResult<tempfile::NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("veil-preview-").suffix(".jpg");
        let file = match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };
        file.map_err(|e| SanitizeError::encode("jpeg", format!("cannot create scratch file: {e}")))
    }
}
