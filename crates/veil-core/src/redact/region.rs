//! Content types, redaction targets, and rectangular regions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{SanitizeError, SanitizeResult};

/// Kind of sensitive content to redact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    LicensePlate,
    Text,
    Face,
    Custom,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [
        ContentType::LicensePlate,
        ContentType::Text,
        ContentType::Face,
        ContentType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::LicensePlate => "license_plate",
            ContentType::Text => "text",
            ContentType::Face => "face",
            ContentType::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContentType::LicensePlate => "License Plates",
            ContentType::Text => "Text & Signs",
            ContentType::Face => "Faces",
            ContentType::Custom => "Custom Region",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ContentType::LicensePlate => "Vehicle registration plates near the bottom of the frame",
            ContentType::Text => "Banners, captions and signage along the edges and center",
            ContentType::Face => "Skin-tone areas",
            ContentType::Custom => "A caller-supplied rectangle",
        }
    }

    /// Parse without failing: unrecognized names are treated as `Text`.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown content type '{}', treating as text", s);
            ContentType::Text
        })
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = SanitizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "license_plate" => Ok(ContentType::LicensePlate),
            "text" => Ok(ContentType::Text),
            "face" => Ok(ContentType::Face),
            "custom" => Ok(ContentType::Custom),
            _ => Err(SanitizeError::Validation(format!(
                "invalid content type '{s}', must be one of: license_plate, text, face, custom"
            ))),
        }
    }
}

/// A caller-supplied rectangle in pixel coordinates, before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl CustomRect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self { x, y, width, height }
    }

    /// Clamp into a `width` x `height` image.
    ///
    /// The origin is pinned inside the image, then the extent is cut to what
    /// remains. Negative extents collapse to zero.
    pub fn clamp(&self, width: u32, height: u32) -> Region {
        let w = i64::from(width);
        let h = i64::from(height);
        let x = self.x.clamp(0, (w - 1).max(0));
        let y = self.y.clamp(0, (h - 1).max(0));
        let rw = self.width.clamp(0, w - x);
        let rh = self.height.clamp(0, h - y);

        Region {
            x: x as u32,
            y: y as u32,
            width: rw as u32,
            height: rh as u32,
        }
    }
}

/// What to redact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    LicensePlate,
    Text,
    Face,
    Custom(CustomRect),
}

impl Target {
    /// Pair a content type with its rectangle. `Custom` requires one.
    pub fn from_content_type(content: ContentType, rect: Option<CustomRect>) -> SanitizeResult<Self> {
        match (content, rect) {
            (ContentType::LicensePlate, _) => Ok(Target::LicensePlate),
            (ContentType::Text, _) => Ok(Target::Text),
            (ContentType::Face, _) => Ok(Target::Face),
            (ContentType::Custom, Some(rect)) => Ok(Target::Custom(rect)),
            (ContentType::Custom, None) => Err(SanitizeError::Validation(
                "custom content type requires a region (x, y, width, height)".to_string(),
            )),
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            Target::LicensePlate => ContentType::LicensePlate,
            Target::Text => ContentType::Text,
            Target::Face => ContentType::Face,
            Target::Custom(_) => ContentType::Custom,
        }
    }
}

/// An axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Non-empty and fully inside a `width` x `height` image.
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && u64::from(self.x) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(height)
    }

    pub fn end_x(&self) -> u32 {
        self.x + self.width
    }

    pub fn end_y(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.end_x() && py >= self.y && py < self.end_y()
    }
}

/// A region expressed as fractions of the image size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Template {
    pub y0: f64,
    pub y1: f64,
    pub x0: f64,
    pub x1: f64,
}

const fn template(y0: f64, y1: f64, x0: f64, x1: f64) -> Template {
    Template { y0, y1, x0, x1 }
}

/// Where plates usually sit: the bottom band, its corners, and just above.
pub const LICENSE_PLATE_TEMPLATES: [Template; 6] = [
    template(0.85, 0.95, 0.35, 0.65),
    template(0.85, 0.95, 0.05, 0.25),
    template(0.85, 0.95, 0.75, 0.95),
    template(0.75, 0.82, 0.35, 0.65),
    template(0.88, 0.92, 0.25, 0.75),
    template(0.78, 0.82, 0.30, 0.70),
];

/// Top banner and corners, a center strip, and bottom captions.
pub const TEXT_TEMPLATES: [Template; 7] = [
    template(0.02, 0.08, 0.25, 0.75),
    template(0.02, 0.08, 0.02, 0.20),
    template(0.02, 0.08, 0.80, 0.98),
    template(0.45, 0.55, 0.35, 0.65),
    template(0.85, 0.92, 0.30, 0.70),
    template(0.88, 0.95, 0.05, 0.25),
    template(0.88, 0.95, 0.75, 0.95),
];

impl Template {
    /// Resolve against image dimensions, flooring each edge.
    ///
    /// Returns `None` when the result is empty, which happens on images too
    /// small for the fractions to span a pixel.
    pub fn resolve(&self, width: u32, height: u32) -> Option<Region> {
        let w = f64::from(width);
        let h = f64::from(height);
        let y0 = (h * self.y0) as u32;
        let y1 = (h * self.y1) as u32;
        let x0 = (w * self.x0) as u32;
        let x1 = (w * self.x1) as u32;

        if y1 <= y0 || x1 <= x0 {
            return None;
        }
        let region = Region {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        };
        region.fits(width, height).then_some(region)
    }
}

/// Resolve every template, dropping the degenerate ones.
pub fn resolve_all(templates: &[Template], width: u32, height: u32) -> Vec<Region> {
    templates
        .iter()
        .filter_map(|t| t.resolve(width, height))
        .collect()
}
