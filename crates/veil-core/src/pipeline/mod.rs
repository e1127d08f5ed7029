//! Shared decode/encode plumbing used by both engines.
//!
//! - **validate**: size limits and container sniffing
//! - **decode**: bytes → pixel buffer
//! - **encode**: pixel buffer → metadata-free bytes
//! - **discovery**: find images under a directory

pub mod decode;
pub mod discovery;
pub mod encode;
pub mod validate;

pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use encode::{encode_rgb, flatten_to_rgb, OutputFormat};
pub use validate::{Container, Validator};
