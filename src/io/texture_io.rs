//! Texture I/O: reading image files, decoding embedded data URIs and
//! checking that texture bytes hold a supported image.

use std::fs;
use std::path::Path;

use base64::Engine;
use image::ImageFormat;

#[remain::sorted]
#[derive(Debug, thiserror::Error)]
pub enum Err {
    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Failed to read texture file '{path}': {source}")]
    Io { path: String, source: std::io::Error },
    #[error("Not a data URI")]
    NotADataUri,
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
}


/// Reads the encoded bytes of a texture file.
pub fn read_texture_file(path: &Path) -> Result<Vec<u8>, Err> {
    fs::read(path).map_err(|source| Err::Io { path: path.display().to_string(), source })
}

/// Decodes a `data:[<mime>][;base64],<payload>` URI into the bytes it carries.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, Err> {
    let rest = uri.strip_prefix("data:").ok_or(Err::NotADataUri)?;
    let (header, payload) = rest.split_once(',').ok_or(Err::NotADataUri)?;
    if header.ends_with(";base64") {
        Ok(base64::engine::general_purpose::STANDARD.decode(payload.trim())?)
    } else {
        // plain data URIs carry the bytes as-is
        Ok(payload.as_bytes().to_vec())
    }
}

/// Returns the image format of an encoded texture stored in `bytes`.
/// Only PNG is accepted for now.
pub fn image_format_from_buffer(bytes: &[u8]) -> Result<ImageFormat, Err> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => Ok(ImageFormat::Png),
        Ok(other) => Err(Err::UnsupportedFormat(format!("{:?}", other))),
        Err(e) => Err(Err::UnsupportedFormat(e.to_string())),
    }
}
