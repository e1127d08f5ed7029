//! Skin-tone masking for face redaction.
//!
//! A color-range heuristic, not a detector: any pixel whose HSV falls in the
//! configured band is treated as skin, and the mask is cleaned up with a
//! morphological close followed by an open.

use image::{GrayImage, ImageBuffer, Luma, Pixel, Rgb};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{close, open};

use crate::config::SkinToneConfig;

const MASK_ON: u8 = 255;

/// HSV on an 8-bit scale: hue in `0..180`, saturation and value in `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

pub fn rgb_to_hsv(pixel: Rgb<u8>) -> Hsv {
    let [r, g, b] = pixel.0.map(f32::from);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max > 0.0 { 255.0 * delta / max } else { 0.0 };

    let hue_degrees = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    let hue_degrees = if hue_degrees < 0.0 {
        hue_degrees + 360.0
    } else {
        hue_degrees
    };

    Hsv {
        // 360 wraps to 0 after halving and rounding
        h: ((hue_degrees / 2.0).round() as u32 % 180) as u8,
        s: s.round() as u8,
        v: max as u8,
    }
}

/// Inclusive HSV band classified as skin.
#[derive(Debug, Clone)]
pub struct SkinToneBand {
    hue: (u8, u8),
    saturation: (u8, u8),
    value: (u8, u8),
    morph_radius: u8,
}

impl Default for SkinToneBand {
    fn default() -> Self {
        Self::from_config(&SkinToneConfig::default())
    }
}

impl SkinToneBand {
    pub fn from_config(config: &SkinToneConfig) -> Self {
        Self {
            hue: (config.hue_min, config.hue_max),
            saturation: (config.saturation_min, config.saturation_max),
            value: (config.value_min, config.value_max),
            // a k x k square structuring element is radius k/2 under L-infinity
            morph_radius: config.morph_kernel_size / 2,
        }
    }

    pub fn contains(&self, hsv: Hsv) -> bool {
        (self.hue.0..=self.hue.1).contains(&hsv.h)
            && (self.saturation.0..=self.saturation.1).contains(&hsv.s)
            && (self.value.0..=self.value.1).contains(&hsv.v)
    }

    /// Binary mask (0 or 255) of skin-colored pixels after close then open.
    pub fn mask<P>(&self, image: &ImageBuffer<P, Vec<u8>>) -> GrayImage
    where
        P: Pixel<Subpixel = u8>,
    {
        let raw = GrayImage::from_fn(image.width(), image.height(), |x, y| {
            let hsv = rgb_to_hsv(image.get_pixel(x, y).to_rgb());
            Luma([if self.contains(hsv) { MASK_ON } else { 0 }])
        });

        if self.morph_radius == 0 {
            return raw;
        }
        let closed = close(&raw, Norm::LInf, self.morph_radius);
        open(&closed, Norm::LInf, self.morph_radius)
    }
}

/// Take pixels from `blurred` wherever `mask` is set, leaving the rest of
/// `image` untouched.
pub fn composite<P>(image: &mut ImageBuffer<P, Vec<u8>>, blurred: &ImageBuffer<P, Vec<u8>>, mask: &GrayImage)
where
    P: Pixel<Subpixel = u8>,
{
    for (x, y, m) in mask.enumerate_pixels() {
        if m[0] != 0 {
            image.put_pixel(x, y, *blurred.get_pixel(x, y));
        }
    }
}

pub fn mask_is_empty(mask: &GrayImage) -> bool {
    mask.as_raw().iter().all(|&v| v == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    const SKIN: Rgb<u8> = Rgb([224, 172, 140]);
    const SKY: Rgb<u8> = Rgb([70, 130, 220]);

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(rgb_to_hsv(Rgb([255, 0, 0])), Hsv { h: 0, s: 255, v: 255 });
        assert_eq!(rgb_to_hsv(Rgb([0, 255, 0])), Hsv { h: 60, s: 255, v: 255 });
        assert_eq!(rgb_to_hsv(Rgb([0, 0, 255])), Hsv { h: 120, s: 255, v: 255 });
        assert_eq!(rgb_to_hsv(Rgb([0, 0, 0])), Hsv { h: 0, s: 0, v: 0 });
        assert_eq!(rgb_to_hsv(Rgb([128, 128, 128])).s, 0);
    }

    #[test]
    fn test_hue_wraps_below_zero() {
        // magenta-leaning red has a negative raw hue
        let hsv = rgb_to_hsv(Rgb([255, 0, 10]));
        assert!(hsv.h > 170);
        assert!(hsv.h < 180);
    }

    #[test]
    fn test_skin_band_classification() {
        let band = SkinToneBand::default();
        assert!(band.contains(rgb_to_hsv(SKIN)));
        assert!(!band.contains(rgb_to_hsv(SKY)));
        assert!(!band.contains(rgb_to_hsv(Rgb([20, 15, 10]))), "too dark");
        assert!(!band.contains(rgb_to_hsv(Rgb([240, 238, 236]))), "too pale");
    }

    #[test]
    fn test_mask_covers_patch_and_drops_specks() {
        let mut image = RgbImage::from_pixel(60, 40, SKY);
        for y in 10..30 {
            for x in 20..45 {
                image.put_pixel(x, y, SKIN);
            }
        }
        // an isolated speck is removed by the opening
        image.put_pixel(3, 3, SKIN);

        let mask = SkinToneBand::default().mask(&image);
        assert_eq!(mask.get_pixel(30, 20)[0], MASK_ON);
        assert_eq!(mask.get_pixel(5, 35)[0], 0);
        assert_eq!(mask.get_pixel(3, 3)[0], 0);
    }

    #[test]
    fn test_mask_without_skin_is_empty() {
        let image = RgbImage::from_pixel(16, 16, SKY);
        assert!(mask_is_empty(&SkinToneBand::default().mask(&image)));
    }

    #[test]
    fn test_composite_only_touches_masked_pixels() {
        let mut image = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));
        let blurred = RgbImage::from_pixel(4, 4, Rgb([9, 9, 9]));
        let mut mask = GrayImage::new(4, 4);
        mask.put_pixel(1, 2, Luma([MASK_ON]));

        composite(&mut image, &blurred, &mask);
        assert_eq!(image.get_pixel(1, 2).0, [9, 9, 9]);
        assert_eq!(image.get_pixel(2, 1).0, [0, 0, 0]);
    }
}
