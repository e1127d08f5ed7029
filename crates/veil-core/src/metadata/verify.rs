//! Post-removal verification.

use crate::pipeline::validate::sniff;
use crate::types::{MetadataRecord, MetadataValue, VerificationReport};

use super::codec::MetadataCodec;

/// Re-reads sanitized output and reports any metadata left behind.
///
/// Read-only: the image bytes are never modified.
pub struct VerificationReporter {
    display_truncate: usize,
}

impl Default for VerificationReporter {
    fn default() -> Self {
        Self::new(100)
    }
}

impl VerificationReporter {
    /// `display_truncate` caps the characters shown per remaining value.
    pub fn new(display_truncate: usize) -> Self {
        Self { display_truncate }
    }

    pub fn verify(&self, bytes: &[u8]) -> VerificationReport {
        if sniff(bytes).is_none() {
            return VerificationReport {
                success: false,
                remaining_metadata: MetadataRecord::new(),
                metadata_count: 0,
                message: "Verification failed: unrecognized image format".to_string(),
            };
        }

        let record = match MetadataCodec::try_decode(bytes) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Metadata block present but unreadable: {}", e);
                return VerificationReport {
                    success: false,
                    remaining_metadata: MetadataRecord::new(),
                    metadata_count: 0,
                    message: format!("Verification failed: unreadable metadata block ({e})"),
                };
            }
        };
        if record.is_empty() {
            tracing::info!("Verification passed: no metadata found");
            return VerificationReport {
                success: true,
                remaining_metadata: MetadataRecord::new(),
                metadata_count: 0,
                message: "No metadata found - removal successful".to_string(),
            };
        }

        let remaining: MetadataRecord = record
            .into_iter()
            .map(|(tag, value)| (tag, MetadataValue::Text(value.truncated(self.display_truncate))))
            .collect();
        let count = remaining.len();
        tracing::warn!("Verification found {} metadata items remaining", count);

        VerificationReport {
            success: false,
            remaining_metadata: remaining,
            metadata_count: count,
            message: format!("Found {count} metadata items remaining"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_clean_image_passes() {
        let bytes = testing::jpeg_bytes(&testing::gradient(16, 16));
        let report = VerificationReporter::default().verify(&bytes);
        assert!(report.success);
        assert_eq!(report.metadata_count, 0);
        assert!(report.remaining_metadata.is_empty());
    }

    #[test]
    fn test_remaining_tags_reported() {
        let bytes = testing::jpeg_with_exif(&testing::gradient(16, 16), &testing::sample_fields());
        let report = VerificationReporter::default().verify(&bytes);

        assert!(!report.success);
        assert_eq!(report.metadata_count, report.remaining_metadata.len());
        assert!(report.metadata_count >= 6);
        assert_eq!(
            report.remaining_metadata.get("Make"),
            Some(&MetadataValue::Text("Acme".into()))
        );
        assert!(report.message.contains(&report.metadata_count.to_string()));
    }

    #[test]
    fn test_values_truncated_for_display() {
        let bytes = testing::jpeg_with_exif(&testing::gradient(16, 16), &testing::sample_fields());
        let report = VerificationReporter::new(3).verify(&bytes);
        for value in report.remaining_metadata.values() {
            match value {
                MetadataValue::Text(text) => assert!(text.chars().count() <= 3),
                other => panic!("expected text, got {other:?}"),
            }
        }
        assert_eq!(
            report.remaining_metadata.get("Model"),
            Some(&MetadataValue::Text("Sho".into()))
        );
    }

    #[test]
    fn test_unreadable_exif_block_is_not_clean() {
        let bytes = testing::jpeg_with_app1(&testing::gradient(16, 16), &testing::corrupt_exif_payload());
        let report = VerificationReporter::default().verify(&bytes);
        assert!(!report.success);
        assert_eq!(report.metadata_count, 0);
        assert!(report.message.starts_with("Verification failed"));
    }

    #[test]
    fn test_png_without_exif_chunk_passes() {
        let bytes = testing::png_bytes(&testing::gradient(8, 8));
        assert!(VerificationReporter::default().verify(&bytes).success);
    }

    #[test]
    fn test_non_image_reports_failure() {
        let report = VerificationReporter::default().verify(b"plain text");
        assert!(!report.success);
        assert!(report.message.starts_with("Verification failed"));
    }
}
