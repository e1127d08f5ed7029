//! The region redaction engine.

use image::{imageops, DynamicImage, ImageBuffer, Pixel};

use crate::config::{BlurConfig, SkinToneConfig};
use crate::error::{SanitizeError, SanitizeResult};

use super::blur::{blur_passes, BlurProfile, Intensity, KernelSize};
use super::region::{resolve_all, Region, Target, LICENSE_PLATE_TEMPLATES, TEXT_TEMPLATES};
use super::skin::{composite, mask_is_empty, SkinToneBand};

/// Blurs the parts of an image that match a [`Target`].
///
/// Template targets blur fixed fractional regions, `Custom` blurs one clamped
/// rectangle, and `Face` blurs skin-colored areas. Pixels outside the
/// affected area are never modified. Dimensions and color mode are kept for
/// 8-bit luma and RGB(A) inputs; other modes come back as 8-bit RGB.
#[derive(Debug, Clone, Default)]
pub struct RegionRedactor {
    profile: BlurProfile,
    skin: SkinToneBand,
}

impl RegionRedactor {
    pub fn new(blur: &BlurConfig, skin_tone: &SkinToneConfig) -> Self {
        Self {
            profile: BlurProfile::from_config(blur),
            skin: SkinToneBand::from_config(skin_tone),
        }
    }

    /// Rectangles a target covers on a `width` x `height` image.
    ///
    /// Degenerate rectangles are dropped. `Face` has no rectangles: its area
    /// comes from the skin mask.
    pub fn regions(&self, target: &Target, width: u32, height: u32) -> Vec<Region> {
        match target {
            Target::LicensePlate => resolve_all(&LICENSE_PLATE_TEMPLATES, width, height),
            Target::Text => resolve_all(&TEXT_TEMPLATES, width, height),
            Target::Face => Vec::new(),
            Target::Custom(rect) => {
                let region = rect.clamp(width, height);
                if region.fits(width, height) {
                    vec![region]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Kernels applied to each region of `target`.
    ///
    /// Text uses a single pass; everything else blurs twice.
    pub fn kernels(&self, target: &Target, intensity: Intensity) -> Vec<KernelSize> {
        match target {
            Target::Text => vec![self.profile.base(intensity)],
            _ => self.profile.two_pass(intensity).to_vec(),
        }
    }

    /// Redact `image` and return the result.
    pub fn redact(
        &self,
        image: DynamicImage,
        target: &Target,
        intensity: Intensity,
    ) -> SanitizeResult<DynamicImage> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(SanitizeError::Validation(format!(
                "cannot redact an empty {width}x{height} image"
            )));
        }

        tracing::debug!(
            "Redacting {} at {} intensity ({}x{})",
            target.content_type(),
            intensity,
            width,
            height
        );

        let redacted = match image {
            DynamicImage::ImageLuma8(buf) => {
                DynamicImage::ImageLuma8(self.redact_buffer(buf, target, intensity))
            }
            DynamicImage::ImageLumaA8(buf) => {
                DynamicImage::ImageLumaA8(self.redact_buffer(buf, target, intensity))
            }
            DynamicImage::ImageRgb8(buf) => {
                DynamicImage::ImageRgb8(self.redact_buffer(buf, target, intensity))
            }
            DynamicImage::ImageRgba8(buf) => {
                DynamicImage::ImageRgba8(self.redact_buffer(buf, target, intensity))
            }
            other => DynamicImage::ImageRgb8(self.redact_buffer(other.to_rgb8(), target, intensity)),
        };
        Ok(redacted)
    }

    fn redact_buffer<P>(
        &self,
        mut buffer: ImageBuffer<P, Vec<u8>>,
        target: &Target,
        intensity: Intensity,
    ) -> ImageBuffer<P, Vec<u8>>
    where
        P: Pixel<Subpixel = u8> + 'static,
    {
        let kernels = self.kernels(target, intensity);

        if let Target::Face = target {
            let mask = self.skin.mask(&buffer);
            if mask_is_empty(&mask) {
                tracing::info!("No skin-tone areas found, image left unchanged");
                return buffer;
            }
            let blurred = blur_passes(&buffer, &kernels);
            composite(&mut buffer, &blurred, &mask);
            tracing::info!("Blurred skin-tone areas");
            return buffer;
        }

        let regions = self.regions(target, buffer.width(), buffer.height());
        for region in &regions {
            let patch =
                imageops::crop_imm(&buffer, region.x, region.y, region.width, region.height).to_image();
            let blurred = blur_passes(&patch, &kernels);
            imageops::replace(&mut buffer, &blurred, i64::from(region.x), i64::from(region.y));
        }
        tracing::info!(
            "Blurred {} region(s) for {}",
            regions.len(),
            target.content_type()
        );
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::redact::region::CustomRect;
    use crate::testing;
    use image::{GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};

    fn small_redactor() -> RegionRedactor {
        RegionRedactor::new(
            &BlurConfig {
                light: 5,
                medium: 9,
                heavy: 15,
            },
            &SkinToneConfig::default(),
        )
    }

    fn assert_untouched_outside(before: &DynamicImage, after: &DynamicImage, regions: &[Region]) {
        assert_eq!(before.dimensions(), after.dimensions());
        for (x, y, pixel) in before.pixels() {
            if !regions.iter().any(|r| r.contains(x, y)) {
                assert_eq!(pixel, after.get_pixel(x, y), "pixel ({x}, {y}) changed");
            }
        }
    }

    #[test]
    fn test_text_regions_only() {
        let redactor = small_redactor();
        let source = testing::gradient(200, 100);
        let regions = redactor.regions(&Target::Text, 200, 100);
        assert_eq!(regions.len(), TEXT_TEMPLATES.len());

        let out = redactor
            .redact(source.clone(), &Target::Text, Intensity::Medium)
            .unwrap();
        assert_untouched_outside(&source, &out, &regions);
        assert_ne!(source, out);
    }

    #[test]
    fn test_license_plate_regions_only() {
        let redactor = small_redactor();
        let source = testing::gradient(160, 120);
        let regions = redactor.regions(&Target::LicensePlate, 160, 120);
        assert!(!regions.is_empty());

        let out = redactor
            .redact(source.clone(), &Target::LicensePlate, Intensity::Heavy)
            .unwrap();
        assert_untouched_outside(&source, &out, &regions);

        let inside = regions[0];
        let changed = (inside.x..inside.x + inside.width)
            .flat_map(|x| (inside.y..inside.y + inside.height).map(move |y| (x, y)))
            .any(|(x, y)| source.get_pixel(x, y) != out.get_pixel(x, y));
        assert!(changed);
    }

    #[test]
    fn test_custom_region_clamped_scenario() {
        let redactor = RegionRedactor::default();
        let source = testing::gradient(800, 600);
        let target = Target::Custom(CustomRect::new(-5, 10, 10_000, 50));
        let regions = redactor.regions(&target, 800, 600);
        assert_eq!(
            regions,
            vec![Region {
                x: 0,
                y: 10,
                width: 800,
                height: 50
            }]
        );

        let out = redactor.redact(source.clone(), &target, Intensity::Light).unwrap();
        assert_eq!(out.dimensions(), (800, 600));
        assert_untouched_outside(&source, &out, &regions);
    }

    #[test]
    fn test_degenerate_custom_region_is_noop() {
        let redactor = small_redactor();
        let source = testing::gradient(40, 30);
        let target = Target::Custom(CustomRect::new(10, 10, 0, 5));
        assert!(redactor.regions(&target, 40, 30).is_empty());

        let out = redactor.redact(source.clone(), &target, Intensity::Medium).unwrap();
        assert_eq!(out, source);
    }

    #[test]
    fn test_tiny_image_survives_templates() {
        let redactor = RegionRedactor::default();
        let source = testing::gradient(1, 1);
        let out = redactor
            .redact(source.clone(), &Target::LicensePlate, Intensity::Heavy)
            .unwrap();
        assert_eq!(out, source);
    }

    #[test]
    fn test_kernel_passes_per_target() {
        let redactor = RegionRedactor::default();
        assert_eq!(redactor.kernels(&Target::Text, Intensity::Medium).len(), 1);
        assert_eq!(redactor.kernels(&Target::LicensePlate, Intensity::Medium).len(), 2);
        assert_eq!(redactor.kernels(&Target::Face, Intensity::Light).len(), 2);
        for kernel in redactor.kernels(&Target::Custom(CustomRect::new(0, 0, 1, 1)), Intensity::Heavy) {
            assert_eq!(kernel.get() % 2, 1);
        }
    }

    #[test]
    fn test_face_blurs_only_skin_patch() {
        let sky = Rgb([70, 130, 220]);
        let mut img = RgbImage::from_pixel(64, 48, sky);
        for y in 12..36 {
            for x in 20..44 {
                // textured skin so a blur is observable
                let shade = if (x + y) % 2 == 0 { 224 } else { 200 };
                img.put_pixel(x, y, Rgb([shade, 160, 128]));
            }
        }
        let source = DynamicImage::ImageRgb8(img);

        let out = small_redactor()
            .redact(source.clone(), &Target::Face, Intensity::Medium)
            .unwrap();
        assert_eq!(out.get_pixel(2, 2), source.get_pixel(2, 2));
        assert_eq!(out.get_pixel(60, 45), source.get_pixel(60, 45));
        assert_ne!(out.get_pixel(32, 24), source.get_pixel(32, 24));
    }

    #[test]
    fn test_face_without_skin_unchanged() {
        let source = DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 20, Rgb([70, 130, 220])));
        let out = small_redactor()
            .redact(source.clone(), &Target::Face, Intensity::Heavy)
            .unwrap();
        assert_eq!(out, source);
    }

    #[test]
    fn test_color_mode_preserved() {
        let rgba = RgbaImage::from_fn(30, 30, |x, y| Rgba([(x * 8) as u8, (y * 8) as u8, 50, 200]));
        let out = small_redactor()
            .redact(DynamicImage::ImageRgba8(rgba), &Target::Text, Intensity::Light)
            .unwrap();
        assert!(matches!(out, DynamicImage::ImageRgba8(_)));

        let gray = testing::gradient(30, 30).to_luma8();
        let out = small_redactor()
            .redact(DynamicImage::ImageLuma8(gray), &Target::Text, Intensity::Light)
            .unwrap();
        assert!(matches!(out, DynamicImage::ImageLuma8(_)));
    }

    #[test]
    fn test_empty_image_rejected() {
        let err = RegionRedactor::default()
            .redact(DynamicImage::new_rgb8(0, 0), &Target::Text, Intensity::Medium)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
