//! Region redaction: blur sensitive areas of an image.
//!
//! - **blur**: intensities, kernel sizes, separable Gaussian blur
//! - **region**: content types, targets, fractional templates, custom rectangles
//! - **skin**: skin-tone masking for faces
//! - **engine**: applies a target to an image
//! - **preview**: renders a redaction as an inline data URI

pub mod blur;
pub mod engine;
pub mod preview;
pub mod region;
pub mod skin;

pub use blur::{BlurProfile, Intensity, KernelSize};
pub use engine::RegionRedactor;
pub use preview::PreviewAdapter;
pub use region::{ContentType, CustomRect, Region, Target};
pub use skin::SkinToneBand;
