// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Verification photo encoding.
//!
//! The tracker stores photos as data URIs, the same shape a browser's
//! `FileReader.readAsDataURL` produces. The server accepts raw image bytes,
//! sniffs the format from magic bytes, and base64-encodes the result.

use base64::{engine::general_purpose::STANDARD, Engine};

/// Upload size cap. Matches the body limit on the photo route.
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Encode raw image bytes as a `data:` URI.
pub fn to_data_uri(bytes: &[u8]) -> Result<String, PhotoError> {
    if bytes.is_empty() {
        return Err(PhotoError::Empty);
    }
    if bytes.len() > MAX_PHOTO_BYTES {
        return Err(PhotoError::TooLarge {
            size: bytes.len(),
            limit: MAX_PHOTO_BYTES,
        });
    }
    let mime = sniff_mime(bytes).ok_or(PhotoError::UnrecognizedFormat)?;
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

/// Identify the image format from its magic bytes.
fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

/// Errors from photo encoding.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PhotoError {
    #[error("empty photo upload")]
    Empty,

    #[error("photo is {size} bytes; the limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    #[error("unrecognized image format")]
    UnrecognizedFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpeg_data_uri() {
        let bytes = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        let uri = to_data_uri(&bytes).unwrap();
        assert!(uri.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_png_data_uri() {
        let bytes = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        let uri = to_data_uri(&bytes).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_webp_needs_riff_and_webp_markers() {
        let mut bytes = b"RIFF\x00\x00\x00\x00WEBPVP8 ".to_vec();
        assert!(to_data_uri(&bytes).unwrap().starts_with("data:image/webp"));

        bytes[8..12].copy_from_slice(b"WAVE");
        assert_eq!(to_data_uri(&bytes), Err(PhotoError::UnrecognizedFormat));
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(to_data_uri(&[]), Err(PhotoError::Empty));
    }

    #[test]
    fn test_oversized_rejected() {
        let mut bytes = vec![0u8; MAX_PHOTO_BYTES + 1];
        bytes[..3].copy_from_slice(&[0xFF, 0xD8, 0xFF]);
        assert_eq!(
            to_data_uri(&bytes),
            Err(PhotoError::TooLarge {
                size: MAX_PHOTO_BYTES + 1,
                limit: MAX_PHOTO_BYTES,
            })
        );
    }

    #[test]
    fn test_unrecognized_bytes_rejected() {
        assert_eq!(
            to_data_uri(b"not an image"),
            Err(PhotoError::UnrecognizedFormat)
        );
    }
}
