//! Rule-based privacy assessment of decoded metadata.
//!
//! Location data is high risk, capture timestamps moderate, and device
//! identification low. No remote model is consulted.

use crate::types::{MetadataRecord, RiskLevel, SensitiveTag, SensitivityReport};

use super::codec::GPS_INFO;

/// Sensitive tags and their risk, in reporting order.
pub const SENSITIVE_TAGS: [(&str, RiskLevel); 6] = [
    (GPS_INFO, RiskLevel::High),
    ("DateTime", RiskLevel::Moderate),
    ("DateTimeOriginal", RiskLevel::Moderate),
    ("Make", RiskLevel::Low),
    ("Model", RiskLevel::Low),
    ("Software", RiskLevel::Low),
];

/// Assess which sensitive tags a record carries.
///
/// Make and Model travel together: if either is present both are flagged,
/// so a policy built from the result clears the device identity entirely.
pub fn assess(record: &MetadataRecord) -> SensitivityReport {
    let device_present = record.contains_key("Make") || record.contains_key("Model");

    let sensitive_tags: Vec<SensitiveTag> = SENSITIVE_TAGS
        .iter()
        .filter(|(tag, _)| match *tag {
            "Make" | "Model" => device_present,
            other => record.contains_key(other),
        })
        .map(|(tag, risk)| SensitiveTag {
            tag: tag.to_string(),
            risk: *risk,
        })
        .collect();

    let overall_risk = sensitive_tags
        .iter()
        .map(|t| t.risk)
        .max()
        .unwrap_or(RiskLevel::None);

    SensitivityReport {
        overall_risk,
        suggested_policy: sensitive_tags.iter().map(|t| t.tag.clone()).collect(),
        sensitive_tags,
        metadata_count: record.len(),
    }
}
