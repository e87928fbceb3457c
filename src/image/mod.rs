//! Local image loading and base64 encoding.
//!
//! The image block submitted to Bedrock carries the file's bytes as a
//! standard-alphabet base64 string plus a format label derived from the file
//! extension. The only normalization applied is `jpg` -> `jpeg`, because the
//! service's accepted format vocabulary has no `jpg`; every other extension
//! passes through lowercased, unvalidated.

use crate::error::{BedrockError, ImageError};
use base64::{prelude::BASE64_STANDARD, Engine};
use std::path::Path;
use tracing::debug;

/// An image ready to embed in a request payload.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    /// Declared image format (e.g. "png", "jpeg").
    pub format: String,
    /// Base64-encoded file bytes.
    pub base64: String,
}

/// Read an image file and prepare it for submission.
///
/// A missing file fails here, before any request is built or sent.
pub fn load_image(path: &Path) -> Result<ImagePayload, BedrockError> {
    let bytes = read_image(path)?;
    let format = format_from_path(path);

    debug!(
        path = %path.display(),
        format = %format,
        size = bytes.len(),
        "Loaded image"
    );

    Ok(ImagePayload {
        format,
        base64: encode_bytes(&bytes),
    })
}

/// Read raw image bytes from disk.
pub fn read_image(path: &Path) -> Result<Vec<u8>, BedrockError> {
    std::fs::read(path).map_err(|e| {
        let error = if e.kind() == std::io::ErrorKind::NotFound {
            ImageError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ImageError::Read {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        };
        BedrockError::Image(error)
    })
}

/// Derive the declared format from a file path's extension.
pub fn format_from_path(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    normalize_format(ext)
}

/// Normalize a file extension into the service's format vocabulary.
///
/// `jpg` becomes `jpeg`; anything else is passed through lowercased without
/// validation against a supported-format set.
pub fn normalize_format(extension: &str) -> String {
    let lower = extension.to_lowercase();
    if lower == "jpg" {
        "jpeg".to_string()
    } else {
        lower
    }
}

/// Base64-encode raw bytes with the standard alphabet.
pub fn encode_bytes(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(bytes)
}
