//! EXIF decoding into a normalized [`MetadataRecord`].

use exif::{Context, Exif, In, Reader, Tag, Value};
use std::collections::BTreeMap;
use std::io::Cursor;

use crate::types::{MetadataRecord, MetadataValue};

/// Key under which GPS sub-tags are nested.
pub const GPS_INFO: &str = "GPSInfo";

/// Decodes embedded EXIF blocks from JPEG, PNG, TIFF, WebP and HEIF containers.
pub struct MetadataCodec;

impl MetadataCodec {
    /// Decode the metadata block of an encoded image.
    ///
    /// Never fails: an image without metadata, or with a block that cannot be
    /// parsed, yields an empty record.
    pub fn decode(bytes: &[u8]) -> MetadataRecord {
        Self::try_decode(bytes).unwrap_or_else(|e| {
            tracing::debug!("No readable metadata block: {}", e);
            MetadataRecord::new()
        })
    }

    /// Decode, keeping "no block" apart from "block present but unreadable".
    ///
    /// A container without an EXIF block is an empty record; any other
    /// reader error is returned.
    pub fn try_decode(bytes: &[u8]) -> Result<MetadataRecord, exif::Error> {
        match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
            Ok(exif) => Ok(record_from(&exif)),
            Err(exif::Error::NotFound(container)) => {
                tracing::debug!("No metadata block in {} container", container);
                Ok(MetadataRecord::new())
            }
            Err(e) => Err(e),
        }
    }
}

fn record_from(exif: &Exif) -> MetadataRecord {
    let mut record = MetadataRecord::new();
    let mut gps = BTreeMap::new();

    // Thumbnail IFD fields describe the embedded preview, not the image.
    for field in exif.fields().filter(|f| f.ifd_num == In::PRIMARY) {
        if is_ifd_pointer(field.tag) {
            continue;
        }
        let Some(value) = normalize(&field.value) else {
            tracing::trace!("Skipping {} with unparsed value", field.tag);
            continue;
        };
        let name = tag_name(field.tag);
        if field.tag.context() == Context::Gps {
            gps.insert(name, value);
        } else {
            record.insert(name, value);
        }
    }

    if !gps.is_empty() {
        record.insert(GPS_INFO.to_string(), MetadataValue::Map(gps));
    }

    tracing::debug!("Decoded {} metadata tags", record.len());
    record
}

fn is_ifd_pointer(tag: Tag) -> bool {
    matches!(
        tag,
        Tag::ExifIFDPointer | Tag::GPSInfoIFDPointer | Tag::InteropIFDPointer
    )
}

/// Canonical name from the tag dictionary, or the numeric id when unknown.
fn tag_name(tag: Tag) -> String {
    match tag.description() {
        Some(_) => tag.to_string(),
        None => tag.number().to_string(),
    }
}

/// Reduce a raw EXIF value to interchange-safe primitives.
///
/// Returns `None` for values the reader could not parse at all.
fn normalize(value: &Value) -> Option<MetadataValue> {
    let normalized = match value {
        Value::Byte(bytes) | Value::Undefined(bytes, _) => MetadataValue::Text(lossy_text(bytes)),
        Value::Ascii(strings) => collapse(
            strings
                .iter()
                .map(|s| MetadataValue::Text(lossy_text(s)))
                .collect(),
        ),
        Value::Short(v) => collapse(v.iter().map(|&n| MetadataValue::Integer(n.into())).collect()),
        Value::Long(v) => collapse(v.iter().map(|&n| MetadataValue::Integer(n.into())).collect()),
        Value::SByte(v) => collapse(v.iter().map(|&n| MetadataValue::Integer(n.into())).collect()),
        Value::SShort(v) => collapse(v.iter().map(|&n| MetadataValue::Integer(n.into())).collect()),
        Value::SLong(v) => collapse(v.iter().map(|&n| MetadataValue::Integer(n.into())).collect()),
        Value::Rational(v) => collapse(v.iter().map(|r| MetadataValue::Float(r.to_f64())).collect()),
        Value::SRational(v) => {
            collapse(v.iter().map(|r| MetadataValue::Float(r.to_f64())).collect())
        }
        Value::Float(v) => collapse(v.iter().map(|&n| MetadataValue::Float(n.into())).collect()),
        Value::Double(v) => collapse(v.iter().map(|&n| MetadataValue::Float(n)).collect()),
        Value::Unknown(..) => return None,
        #[allow(unreachable_patterns)]
        _ => return None,
    };
    Some(normalized)
}

/// Single-element arrays become scalars.
fn collapse(mut values: Vec<MetadataValue>) -> MetadataValue {
    if values.len() == 1 {
        values.remove(0)
    } else {
        MetadataValue::Sequence(values)
    }
}

/// UTF-8 with U+FFFD for invalid sequences and trailing NULs trimmed.
fn lossy_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches('\0')
        .to_string()
}
