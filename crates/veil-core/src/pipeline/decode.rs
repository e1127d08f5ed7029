//! Image decoding with format detection and dimension limits.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

use crate::config::LimitsConfig;
use crate::error::{SanitizeError, SanitizeResult};

use super::validate::Validator;

/// Image decoder with configurable limits.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an image.
#[derive(Debug)]
pub struct DecodedImage {
    /// The decoded pixel buffer
    pub image: DynamicImage,
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Size of the encoded input in bytes
    pub byte_len: usize,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Validate and decode an in-memory image.
    pub fn decode(&self, bytes: &[u8]) -> SanitizeResult<DecodedImage> {
        Validator::new(self.limits.clone()).validate(bytes)?;

        let decoded = decode_bytes(bytes)?;
        if decoded.width > self.limits.max_image_dimension
            || decoded.height > self.limits.max_image_dimension
        {
            return Err(SanitizeError::Validation(format!(
                "image too large: {}x{} > {}",
                decoded.width, decoded.height, self.limits.max_image_dimension
            )));
        }
        Ok(decoded)
    }
}

/// Decode bytes without limit checks, detecting the format from content.
pub fn decode_bytes(bytes: &[u8]) -> SanitizeResult<DecodedImage> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| SanitizeError::decode(format!("cannot detect image format: {e}")))?;
    let format = reader
        .format()
        .ok_or_else(|| SanitizeError::decode("unsupported image format"))?;
    let image = reader
        .decode()
        .map_err(|e| SanitizeError::decode(e.to_string()))?;

    let (width, height) = image.dimensions();
    tracing::debug!("Decoded {:?} image {}x{}", format, width, height);
    Ok(DecodedImage {
        image,
        format,
        width,
        height,
        byte_len: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing;

    #[test]
    fn test_decode_png_detected_by_content() {
        let bytes = testing::png_bytes(&testing::gradient(40, 30));
        let decoded = ImageDecoder::new(LimitsConfig::default())
            .decode(&bytes)
            .unwrap();
        assert_eq!(decoded.format, ImageFormat::Png);
        assert_eq!((decoded.width, decoded.height), (40, 30));
        assert_eq!(decoded.byte_len, bytes.len());
    }

    #[test]
    fn test_decode_truncated_jpeg_fails() {
        let mut bytes = testing::jpeg_bytes(&testing::gradient(64, 64));
        bytes.truncate(20);
        let err = decode_bytes(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_decode_enforces_dimension_limit() {
        let limits = LimitsConfig {
            max_image_dimension: 32,
            ..LimitsConfig::default()
        };
        let bytes = testing::png_bytes(&testing::gradient(64, 16));
        let err = ImageDecoder::new(limits).decode(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
