//! Metadata engine: decode, assess, strip, verify.
//!
//! - **codec**: EXIF block → normalized [`MetadataRecord`](crate::types::MetadataRecord)
//! - **sensitivity**: rule-based risk assessment of a record
//! - **redactor**: re-encode without metadata
//! - **verify**: certify that sanitized output carries no tags

pub mod codec;
pub mod redactor;
pub mod sensitivity;
pub mod verify;

pub use codec::{MetadataCodec, GPS_INFO};
pub use redactor::{MetadataRedactor, SelectiveRemoval};
pub use sensitivity::assess;
pub use verify::VerificationReporter;
