//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::RemovalPolicy;

/// Processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of files sanitized concurrently in batch mode
    pub parallel_workers: usize,

    /// Extensions picked up when walking a directory
    pub supported_formats: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            parallel_workers: 4,
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "webp".to_string(),
                "tif".to_string(),
                "tiff".to_string(),
            ],
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum input size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            max_image_dimension: 10000,
        }
    }
}

/// Base Gaussian kernel size per blur intensity.
///
/// Even values are accepted here and coerced to the next odd size when the
/// profile is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurConfig {
    pub light: u32,
    pub medium: u32,
    pub heavy: u32,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            light: 101,
            medium: 200,
            heavy: 301,
        }
    }
}

/// HSV band treated as skin by the face path.
///
/// Hue uses the 8-bit half-degree scale (0..180), saturation and value 0..=255.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinToneConfig {
    pub hue_min: u8,
    pub hue_max: u8,
    pub saturation_min: u8,
    pub saturation_max: u8,
    pub value_min: u8,
    pub value_max: u8,

    /// Side of the square structuring element used to clean up the mask
    pub morph_kernel_size: u8,
}

impl Default for SkinToneConfig {
    fn default() -> Self {
        Self {
            hue_min: 0,
            hue_max: 25,
            saturation_min: 30,
            saturation_max: 255,
            value_min: 60,
            value_max: 255,
            morph_kernel_size: 7,
        }
    }
}

/// Re-encoding settings for sanitized output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,

    /// Use maximum PNG compression with adaptive filtering
    pub png_optimize: bool,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 95,
            png_optimize: true,
        }
    }
}

/// Inline preview settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Directory for the transient preview file (system temp dir when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<PathBuf>,

    /// JPEG quality of the inline payload
    pub jpeg_quality: u8,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            scratch_dir: None,
            jpeg_quality: 95,
        }
    }
}

/// Metadata inspection and removal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Tags dropped by selective removal when the caller names none
    pub removal_policy: RemovalPolicy,

    /// Maximum characters shown per value in verification reports
    pub display_truncate: usize,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            removal_policy: RemovalPolicy::default(),
            display_truncate: 100,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Report format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON reports
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,

    /// Log format (pretty, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
