//! In-memory fixtures for unit tests.
//!
//! Images are synthesized rather than checked in, and EXIF blocks are built
//! with the `kamadak-exif` writer and spliced into JPEG APP1 segments.

use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;

/// An RGB image where every pixel differs from its neighbours.
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([
            ((x * 7 + y * 3) % 256) as u8,
            ((x * 13 + y * 29) % 256) as u8,
            ((x * y + 17) % 256) as u8,
        ])
    });
    DynamicImage::ImageRgb8(img)
}

pub fn jpeg_bytes(image: &DynamicImage) -> Vec<u8> {
    encode_as(image, ImageFormat::Jpeg)
}

pub fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    encode_as(image, ImageFormat::Png)
}

fn encode_as(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

fn ascii(tag: Tag, text: &str) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![text.as_bytes().to_vec()]),
    }
}

fn dms(tag: Tag, degrees: u32, minutes: u32, seconds: u32) -> Field {
    let r = |num| Rational { num, denom: 1 };
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Rational(vec![r(degrees), r(minutes), r(seconds)]),
    }
}

/// Make, DateTime, Software and a GPS position of 10°30'N 20°15'E.
pub fn sample_fields() -> Vec<Field> {
    vec![
        ascii(Tag::Make, "Acme"),
        ascii(Tag::Model, "Shooter 3000"),
        ascii(Tag::DateTime, "2024:05:01 12:30:00"),
        ascii(Tag::Software, "darkroom 1.2"),
        Field {
            tag: Tag::Orientation,
            ifd_num: In::PRIMARY,
            value: Value::Short(vec![1]),
        },
        Field {
            tag: Tag::XResolution,
            ifd_num: In::PRIMARY,
            value: Value::Rational(vec![Rational { num: 144, denom: 2 }]),
        },
        Field {
            tag: Tag::UserComment,
            ifd_num: In::PRIMARY,
            value: Value::Undefined(vec![b'o', b'k', 0xFF, b'!'], 0),
        },
        dms(Tag::GPSLatitude, 10, 30, 0),
        ascii(Tag::GPSLatitudeRef, "N"),
        dms(Tag::GPSLongitude, 20, 15, 0),
        ascii(Tag::GPSLongitudeRef, "E"),
    ]
}

/// Serialize fields into a little-endian TIFF-structured EXIF block.
pub fn exif_blob(fields: &[Field]) -> Vec<u8> {
    let mut writer = Writer::new();
    for field in fields {
        writer.push_field(field);
    }
    let mut buffer = Cursor::new(Vec::new());
    writer.write(&mut buffer, true).unwrap();
    buffer.into_inner()
}

/// Encode `image` as JPEG and insert an `Exif` APP1 segment after SOI.
pub fn jpeg_with_exif(image: &DynamicImage, fields: &[Field]) -> Vec<u8> {
    jpeg_with_app1(image, &exif_blob(fields))
}

/// Encode `image` as JPEG with `tiff` spliced in as the `Exif` APP1 payload,
/// whether or not it is a well-formed TIFF structure.
pub fn jpeg_with_app1(image: &DynamicImage, tiff: &[u8]) -> Vec<u8> {
    let jpeg = jpeg_bytes(image);

    let segment_len = (2 + 6 + tiff.len()) as u16;
    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// A big-endian TIFF header whose first IFD offset points far past the end.
pub fn corrupt_exif_payload() -> Vec<u8> {
    let mut payload = b"MM\0*\xff\xff\xff\xf0".to_vec();
    payload.extend_from_slice(b"GPS 10,30N 20,15E Make=Acme");
    payload
}
