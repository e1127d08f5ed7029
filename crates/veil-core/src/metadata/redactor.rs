//! Rebuilding images without their metadata block.

use crate::config::{EncodeConfig, LimitsConfig};
use crate::error::SanitizeResult;
use crate::pipeline::decode::{decode_bytes, ImageDecoder};
use crate::pipeline::encode::{encode_rgb, flatten_to_rgb, OutputFormat};
use crate::types::RemovalPolicy;

use super::codec::MetadataCodec;

/// Outcome of a selective removal.
#[derive(Debug, Clone)]
pub struct SelectiveRemoval {
    /// The re-encoded image
    pub bytes: Vec<u8>,
    /// Tags present in the source and named by the policy
    pub removed: Vec<String>,
    /// Tags present in the source and outside the policy
    pub kept: Vec<String>,
}

/// Strips metadata by re-encoding pixel data into a fresh container.
///
/// Pixel content is preserved exactly up to the color-mode normalization
/// (alpha flattened onto white, everything reduced to 8-bit RGB) and the
/// lossiness of the target codec.
pub struct MetadataRedactor {
    config: EncodeConfig,
    decoder: Option<ImageDecoder>,
}

impl MetadataRedactor {
    pub fn new(config: EncodeConfig) -> Self {
        Self {
            config,
            decoder: None,
        }
    }

    /// Enforce size and dimension limits before decoding.
    pub fn with_limits(mut self, limits: LimitsConfig) -> Self {
        self.decoder = Some(ImageDecoder::new(limits));
        self
    }

    /// Remove every metadata tag.
    ///
    /// `source_format` is the source file extension and selects the output
    /// container; unknown extensions are written as JPEG.
    pub fn remove_all(&self, bytes: &[u8], source_format: &str) -> SanitizeResult<Vec<u8>> {
        let decoded = match &self.decoder {
            Some(decoder) => decoder.decode(bytes)?,
            None => decode_bytes(bytes)?,
        };
        let rgb = flatten_to_rgb(&decoded.image);
        let format = OutputFormat::from_extension(source_format);
        let clean = encode_rgb(&rgb, format, &self.config)?;

        tracing::info!(
            "Metadata removed ({}x{}, {} -> {} bytes as {})",
            decoded.width,
            decoded.height,
            bytes.len(),
            clean.len(),
            format.extension()
        );
        Ok(clean)
    }

    /// Remove the tags named by `policy`.
    ///
    /// The present tags are partitioned into removed/kept for reporting, but
    /// the emitted image carries no metadata at all: kept tags are not written
    /// back, so the output matches [`remove_all`](Self::remove_all).
    pub fn remove_selected(
        &self,
        bytes: &[u8],
        source_format: &str,
        policy: &RemovalPolicy,
    ) -> SanitizeResult<SelectiveRemoval> {
        let record = MetadataCodec::decode(bytes);
        let (removed, kept): (Vec<String>, Vec<String>) =
            record.into_keys().partition(|tag| policy.contains(tag));

        for tag in &removed {
            tracing::debug!("Removing metadata: {}", tag);
        }

        let clean = self.remove_all(bytes, source_format)?;
        tracing::info!(
            "Selective metadata removal completed: removed {} items, kept {} items",
            removed.len(),
            kept.len()
        );
        Ok(SelectiveRemoval {
            bytes: clean,
            removed,
            kept,
        })
    }
}
