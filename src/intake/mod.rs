/// Image intake module
///
/// This module handles:
/// - Reading and decoding user-selected files (decode.rs)
/// - Generating list-row thumbnails (thumbnail.rs)

pub mod decode;
pub mod thumbnail;

pub use decode::{load_batch, DecodeBatch, Decoded};

/// File extensions offered in the file dialog
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff", "ico", "tga", "pnm", "qoi",
];
