//! Core data types shared by the metadata and redaction engines.
//!
//! Everything here is plain data: serializable, owned, and free of any
//! decoder-specific representation.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::pipeline::validate::Container;

/// Normalized tag name → value map extracted from an image's metadata block.
///
/// Keys are canonical tag names ("Make", "DateTimeOriginal", "GPSInfo", ...),
/// or the numeric tag id for tags outside the dictionary.
pub type MetadataRecord = BTreeMap<String, MetadataValue>;

/// A metadata value reduced to interchange-safe primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Sequence(Vec<MetadataValue>),
    Map(BTreeMap<String, MetadataValue>),
}

impl MetadataValue {
    /// Render the value as text, cut to at most `max_chars` characters.
    pub fn truncated(&self, max_chars: usize) -> String {
        let full = self.to_string();
        match full.char_indices().nth(max_chars) {
            Some((idx, _)) => full[..idx].to_string(),
            None => full,
        }
    }

    /// Borrow the nested map of a `GPSInfo`-style value.
    pub fn as_map(&self) -> Option<&BTreeMap<String, MetadataValue>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Sequence(_) | Self::Map(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

/// Tag names targeted by selective metadata removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemovalPolicy(BTreeSet<String>);

impl RemovalPolicy {
    /// Tags removed when the caller does not name any.
    pub const DEFAULT_TAGS: [&'static str; 6] = [
        "GPSInfo",
        "DateTime",
        "DateTimeOriginal",
        "Make",
        "Model",
        "Software",
    ];

    /// Build a policy from tag names.
    ///
    /// An empty list yields the default policy.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = tags.into_iter().map(Into::into).collect();
        if set.is_empty() {
            Self::default()
        } else {
            Self(set)
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for RemovalPolicy {
    fn default() -> Self {
        Self(Self::DEFAULT_TAGS.iter().map(|t| t.to_string()).collect())
    }
}

/// Result of re-reading a sanitized image for leftover metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True when no metadata remains
    pub success: bool,

    /// Remaining tags with values rendered as (truncated) text
    pub remaining_metadata: MetadataRecord,

    /// Number of remaining tags
    pub metadata_count: usize,

    /// Human-readable summary
    pub message: String,
}

/// Summary of a metadata removal run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovalReport {
    /// Number of tags in the source image
    pub original_metadata_count: usize,

    /// Tags targeted for removal
    pub removed: Vec<String>,

    /// Tags outside the removal policy
    pub kept: Vec<String>,

    /// Verification of the emitted image
    pub verification: VerificationReport,
}

/// Privacy risk attached to a group of metadata tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    None,
    Low,
    Moderate,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::None => write!(f, "none"),
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Moderate => write!(f, "moderate"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// A sensitive tag found in an image together with its risk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitiveTag {
    pub tag: String,
    pub risk: RiskLevel,
}

/// Rule-based assessment of what an image's metadata gives away.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityReport {
    /// Highest risk among the sensitive tags found
    pub overall_risk: RiskLevel,

    /// Sensitive tags present, in policy order
    pub sensitive_tags: Vec<SensitiveTag>,

    /// Total number of tags in the image
    pub metadata_count: usize,

    /// Policy that would remove exactly the sensitive tags found
    pub suggested_policy: Vec<String>,
}

/// What a read-only scan learns about an image.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Container detected from the leading bytes
    pub container: Container,

    /// Decoded metadata
    pub metadata: MetadataRecord,

    /// Privacy assessment of `metadata`
    pub sensitivity: SensitivityReport,
}
