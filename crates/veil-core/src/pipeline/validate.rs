//! Cheap checks on encoded input before a full decode.

use serde::Serialize;

use crate::config::LimitsConfig;
use crate::error::{SanitizeError, SanitizeResult};

/// Container families recognized from their leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    Jpeg,
    Png,
    Gif,
    WebP,
    Bmp,
    Tiff,
    /// ISO-BMFF (`ftyp` box): HEIC, HEIF, AVIF
    IsoBmff,
}

/// Validates encoded image bytes before decoding.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Check size limits and the container signature.
    pub fn validate(&self, bytes: &[u8]) -> SanitizeResult<Container> {
        let max_bytes = self.limits.max_file_size_mb * 1024 * 1024;
        if bytes.len() as u64 > max_bytes {
            return Err(SanitizeError::Validation(format!(
                "input too large: {}MB > {}MB",
                bytes.len() as u64 / (1024 * 1024),
                self.limits.max_file_size_mb
            )));
        }
        if bytes.len() < 4 {
            return Err(SanitizeError::decode("input too small to be a valid image"));
        }
        sniff(bytes)
            .ok_or_else(|| SanitizeError::decode("unrecognized image format (invalid magic bytes)"))
    }
}

/// Identify the container from its leading bytes.
pub fn sniff(bytes: &[u8]) -> Option<Container> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some(Container::Jpeg),
        [0x89, b'P', b'N', b'G', ..] => Some(Container::Png),
        [b'G', b'I', b'F', b'8', ..] => Some(Container::Gif),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Container::WebP),
        [b'B', b'M', ..] => Some(Container::Bmp),
        [b'I', b'I', 0x2A, 0x00, ..] | [b'M', b'M', 0x00, 0x2A, ..] => Some(Container::Tiff),
        [_, _, _, _, b'f', b't', b'y', b'p', ..] => Some(Container::IsoBmff),
        _ => None,
    }
}
