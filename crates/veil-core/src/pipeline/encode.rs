//! Metadata-free re-encoding of sanitized pixel buffers.
//!
//! The encoders used here never write EXIF, XMP or ICC chunks, so anything
//! produced by [`encode_rgb`] carries pixels only.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::{imageops, DynamicImage, ExtendedColorType, ImageEncoder, RgbImage, Rgba, RgbaImage};

use crate::config::EncodeConfig;
use crate::error::{SanitizeError, SanitizeResult};

/// Output container chosen from the source file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    /// Pick the output format for a file extension.
    ///
    /// Accepts an optional leading dot and any case. Unknown extensions fall
    /// back to JPEG.
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "png" => Self::Png,
            "webp" => Self::WebP,
            _ => Self::Jpeg,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }
}

/// Reduce any color mode to 8-bit RGB.
///
/// Alpha-bearing buffers are composited over opaque white with alpha as the
/// mask; everything else is converted directly.
pub fn flatten_to_rgb(image: &DynamicImage) -> RgbImage {
    if let DynamicImage::ImageRgb8(rgb) = image {
        return rgb.clone();
    }
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    let mut canvas = RgbaImage::from_pixel(rgba.width(), rgba.height(), Rgba([255, 255, 255, 255]));
    imageops::overlay(&mut canvas, &rgba, 0, 0);
    DynamicImage::ImageRgba8(canvas).to_rgb8()
}

/// Encode an RGB buffer without any metadata block.
pub fn encode_rgb(
    image: &RgbImage,
    format: OutputFormat,
    config: &EncodeConfig,
) -> SanitizeResult<Vec<u8>> {
    let (width, height) = image.dimensions();
    let mut buffer = Vec::new();

    let result = match format {
        OutputFormat::Jpeg => {
            let mut encoder = JpegEncoder::new_with_quality(&mut buffer, config.jpeg_quality);
            encoder.encode(image.as_raw(), width, height, ExtendedColorType::Rgb8)
        }
        OutputFormat::Png => {
            let encoder = if config.png_optimize {
                PngEncoder::new_with_quality(
                    &mut buffer,
                    CompressionType::Best,
                    FilterType::Adaptive,
                )
            } else {
                PngEncoder::new(&mut buffer)
            };
            encoder.write_image(image.as_raw(), width, height, ExtendedColorType::Rgb8)
        }
        // The WebP encoder only supports lossless output, which is at least
        // as faithful as a quality-95 lossy encode.
        OutputFormat::WebP => WebPEncoder::new_lossless(&mut buffer).write_image(
            image.as_raw(),
            width,
            height,
            ExtendedColorType::Rgb8,
        ),
    };

    result.map_err(|e| SanitizeError::encode(format.extension(), e.to_string()))?;
    tracing::debug!(
        "Encoded {}x{} as {} ({} bytes)",
        width,
        height,
        format.extension(),
        buffer.len()
    );
    Ok(buffer)
}
