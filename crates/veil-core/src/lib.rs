//! Veil Core - Embeddable image privacy library.
//!
//! Veil sanitizes images before they are shared. It strips embedded
//! metadata (EXIF tags, including GPS coordinates) and blurs regions that
//! commonly hold sensitive content: license plates, text, and faces.
//!
//! # Architecture
//!
//! Two independent engines share the decode/encode plumbing:
//!
//! ```text
//! bytes → Validate → Decode ─┬─ Metadata: decode tags → re-encode clean → verify
//!                            └─ Redaction: template/custom/skin regions → blur
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use veil_core::{Config, Intensity, Target, Veil};
//!
//! fn main() -> veil_core::Result<()> {
//!     let veil = Veil::new(Config::load()?);
//!     let bytes = std::fs::read("./photo.jpg")?;
//!
//!     let stripped = veil.strip(&bytes, "jpg", None)?;
//!     assert!(stripped.report.verification.success);
//!
//!     let image = veil.decode(&bytes)?.image;
//!     let blurred = veil.redact(image, &Target::LicensePlate, Intensity::Heavy)?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod redact;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{ConfigError, ErrorKind, Result, SanitizeError, SanitizeResult, VeilError};
pub use metadata::{assess, MetadataCodec, MetadataRedactor, VerificationReporter};
pub use output::{ReportFormat, ReportWriter};
pub use pipeline::{DecodedImage, DiscoveredFile, FileDiscovery, ImageDecoder, OutputFormat};
pub use redact::{ContentType, CustomRect, Intensity, PreviewAdapter, RegionRedactor, Target};
pub use types::{
    MetadataRecord, MetadataValue, RemovalPolicy, RemovalReport, RiskLevel, ScanReport,
    SensitivityReport, VerificationReport,
};

use image::DynamicImage;

use pipeline::{encode_rgb, flatten_to_rgb, Validator};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A stripped image and the report describing what happened to it.
#[derive(Debug, Clone)]
pub struct StripOutcome {
    /// The re-encoded, metadata-free image
    pub bytes: Vec<u8>,
    /// Output container chosen from the source extension
    pub format: OutputFormat,
    pub report: RemovalReport,
}

/// Veil sanitizer - the main entry point.
///
/// Builds every engine from one [`Config`]. All operations are synchronous
/// and the struct is `Send + Sync`, so hosts may share it across threads.
pub struct Veil {
    config: Config,
    validator: Validator,
    decoder: ImageDecoder,
    redactor: MetadataRedactor,
    reporter: VerificationReporter,
    regions: RegionRedactor,
    preview: PreviewAdapter,
}

impl Veil {
    pub fn new(config: Config) -> Self {
        tracing::debug!("Initializing Veil v{}", VERSION);

        let regions = RegionRedactor::new(&config.blur, &config.skin_tone);
        let mut preview = PreviewAdapter::new(regions.clone(), &config.preview);
        if let Some(dir) = config.scratch_dir() {
            preview = preview.with_scratch_dir(dir);
        }

        Self {
            validator: Validator::new(config.limits.clone()),
            decoder: ImageDecoder::new(config.limits.clone()),
            redactor: MetadataRedactor::new(config.encode.clone()).with_limits(config.limits.clone()),
            reporter: VerificationReporter::new(config.metadata.display_truncate),
            regions,
            preview,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read metadata and assess it, without touching the image.
    pub fn scan(&self, bytes: &[u8]) -> SanitizeResult<ScanReport> {
        let container = self.validator.validate(bytes)?;
        let metadata = MetadataCodec::decode(bytes);
        let sensitivity = assess(&metadata);
        Ok(ScanReport {
            container,
            metadata,
            sensitivity,
        })
    }

    /// Strip metadata and verify the result.
    ///
    /// With no `policy` every tag counts as removed. With one, tags are
    /// partitioned by it for the report; the output carries no metadata
    /// either way.
    pub fn strip(
        &self,
        bytes: &[u8],
        source_format: &str,
        policy: Option<&RemovalPolicy>,
    ) -> SanitizeResult<StripOutcome> {
        let (clean, original_metadata_count, removed, kept) = match policy {
            Some(policy) => {
                let outcome = self.redactor.remove_selected(bytes, source_format, policy)?;
                let count = outcome.removed.len() + outcome.kept.len();
                (outcome.bytes, count, outcome.removed, outcome.kept)
            }
            None => {
                let clean = self.redactor.remove_all(bytes, source_format)?;
                let removed: Vec<String> = MetadataCodec::decode(bytes).into_keys().collect();
                (clean, removed.len(), removed, Vec::new())
            }
        };

        let verification = self.reporter.verify(&clean);
        Ok(StripOutcome {
            bytes: clean,
            format: OutputFormat::from_extension(source_format),
            report: RemovalReport {
                original_metadata_count,
                removed,
                kept,
                verification,
            },
        })
    }

    pub fn verify(&self, bytes: &[u8]) -> VerificationReport {
        self.reporter.verify(bytes)
    }

    /// Validate and decode an image within the configured limits.
    pub fn decode(&self, bytes: &[u8]) -> SanitizeResult<DecodedImage> {
        self.decoder.decode(bytes)
    }

    pub fn redact(
        &self,
        image: DynamicImage,
        target: &Target,
        intensity: Intensity,
    ) -> SanitizeResult<DynamicImage> {
        self.regions.redact(image, target, intensity)
    }

    /// Render a redaction as a `data:image/jpeg;base64,...` URI.
    pub fn preview(
        &self,
        image: &DynamicImage,
        target: &Target,
        intensity: Intensity,
    ) -> SanitizeResult<String> {
        self.preview.preview(image, target, intensity)
    }

    /// Encode a (redacted) image for writing, without any metadata.
    pub fn encode(&self, image: &DynamicImage, format: OutputFormat) -> SanitizeResult<Vec<u8>> {
        encode_rgb(&flatten_to_rgb(image), format, &self.config.encode)
    }
}
