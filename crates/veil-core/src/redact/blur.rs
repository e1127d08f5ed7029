//! Blur intensities, kernel-size arithmetic, and separable Gaussian blur.

use image::{ImageBuffer, Pixel};
use imageproc::filter::separable_filter_equal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::BlurConfig;
use crate::error::SanitizeError;

/// How strongly a region is blurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Light,
    #[default]
    Medium,
    Heavy,
}

impl Intensity {
    pub const ALL: [Intensity; 3] = [Intensity::Light, Intensity::Medium, Intensity::Heavy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Light => "light",
            Intensity::Medium => "medium",
            Intensity::Heavy => "heavy",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Intensity::Light => "Light",
            Intensity::Medium => "Medium",
            Intensity::Heavy => "Heavy",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Intensity::Light => "Subtle blur, shapes remain recognizable",
            Intensity::Medium => "Balanced blur for most content",
            Intensity::Heavy => "Strong blur, content fully obscured",
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intensity {
    type Err = SanitizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Intensity::Light),
            "medium" => Ok(Intensity::Medium),
            "heavy" => Ok(Intensity::Heavy),
            other => Err(SanitizeError::Validation(format!(
                "invalid intensity '{other}', must be one of: light, medium, heavy"
            ))),
        }
    }
}

/// A Gaussian kernel side length. Always odd and positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct KernelSize(u32);

impl KernelSize {
    /// Coerce `size` to a valid kernel: even values go up by one, zero becomes one.
    pub fn new(size: u32) -> Self {
        if size % 2 == 0 {
            Self(size.saturating_add(1))
        } else {
            Self(size)
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Kernel for the second pass of the two-pass scheme: `max(3, base / 2)`.
    pub fn second_pass(self) -> Self {
        Self::new((self.0 / 2).max(3))
    }

    /// Standard deviation implied by the kernel size.
    ///
    /// Matches the convention of deriving sigma from the aperture when no
    /// explicit sigma is given.
    pub fn sigma(self) -> f32 {
        0.3 * ((self.0 as f32 - 1.0) * 0.5 - 1.0) + 0.8
    }
}

/// Maps intensities to kernel sizes.
#[derive(Debug, Clone)]
pub struct BlurProfile {
    light: KernelSize,
    medium: KernelSize,
    heavy: KernelSize,
}

impl Default for BlurProfile {
    fn default() -> Self {
        Self::from_config(&BlurConfig::default())
    }
}

impl BlurProfile {
    pub fn from_config(config: &BlurConfig) -> Self {
        Self {
            light: KernelSize::new(config.light),
            medium: KernelSize::new(config.medium),
            heavy: KernelSize::new(config.heavy),
        }
    }

    /// Base kernel for single-pass blurring.
    pub fn base(&self, intensity: Intensity) -> KernelSize {
        match intensity {
            Intensity::Light => self.light,
            Intensity::Medium => self.medium,
            Intensity::Heavy => self.heavy,
        }
    }

    /// Kernels for the two-pass scheme: base, then the derived second pass.
    pub fn two_pass(&self, intensity: Intensity) -> [KernelSize; 2] {
        let base = self.base(intensity);
        [base, base.second_pass()]
    }
}

/// Apply one Gaussian pass per kernel, in order.
pub fn blur_passes<P>(image: &ImageBuffer<P, Vec<u8>>, kernels: &[KernelSize]) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    let mut out = image.clone();
    for &kernel in kernels {
        out = gaussian_blur(&out, kernel);
    }
    out
}

/// Separable Gaussian blur. Borders are padded by repeating the edge pixel.
pub fn gaussian_blur<P>(image: &ImageBuffer<P, Vec<u8>>, kernel: KernelSize) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || kernel.get() == 1 {
        return image.clone();
    }
    separable_filter_equal(image, &gaussian_weights(kernel))
}

/// Normalized 1-D Gaussian weights of length `kernel`.
fn gaussian_weights(kernel: KernelSize) -> Vec<f32> {
    let size = kernel.get() as i64;
    let center = size / 2;
    let sigma = kernel.sigma();
    let denom = 2.0 * sigma * sigma;

    let mut weights: Vec<f32> = (0..size)
        .map(|i| {
            let d = (i - center) as f32;
            (-(d * d) / denom).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}
