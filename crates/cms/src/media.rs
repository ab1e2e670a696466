//! Embedding uploaded images as `data:` URIs.
//!
//! Images chosen in the dashboard are stored inline in the content document
//! so that the document alone is enough to render the site.

use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD};

/// Errors embedding an image.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// No bytes were supplied.
    #[error("image is empty")]
    Empty,
    /// The bytes are not a supported image format.
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),
    /// The file could not be read.
    #[error("failed to read image {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Detect the MIME type of an image from its leading bytes.
#[must_use]
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(b"WEBP".as_slice())
    {
        Some("image/webp")
    } else if looks_like_svg(bytes) {
        Some("image/svg+xml")
    } else {
        None
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = bytes.get(..512).unwrap_or(bytes);
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

/// Encode `bytes` as a `data:` URI.
///
/// The MIME type comes from the bytes themselves; `declared_mime` is only
/// used when sniffing fails and it names an `image/` type.
///
/// # Errors
///
/// Returns `MediaError::Empty` for no input and
/// `MediaError::UnsupportedType` when the bytes are not a recognised image.
pub fn embed_image(bytes: &[u8], declared_mime: Option<&str>) -> Result<String, MediaError> {
    if bytes.is_empty() {
        return Err(MediaError::Empty);
    }

    let mime = match sniff_mime(bytes) {
        Some(mime) => mime.to_owned(),
        None => match declared_mime {
            Some(declared) if declared.starts_with("image/") => declared.to_owned(),
            other => {
                return Err(MediaError::UnsupportedType(
                    other.unwrap_or("unknown").to_owned(),
                ));
            }
        },
    };

    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

/// Read an image file and encode it as a `data:` URI.
///
/// # Errors
///
/// Returns `MediaError::Read` if the file cannot be read, otherwise as
/// [`embed_image`].
pub async fn embed_image_file(path: &Path) -> Result<String, MediaError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| MediaError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let uri = embed_image(&bytes, None)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Embedded image");
    Ok(uri)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn test_sniff_formats() {
        assert_eq!(sniff_mime(PNG_HEADER), Some("image/png"));
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(sniff_mime(b"GIF89a...."), Some("image/gif"));
        assert_eq!(sniff_mime(b"RIFF\0\0\0\0WEBPVP8 "), Some("image/webp"));
        assert_eq!(
            sniff_mime(b"<?xml version=\"1.0\"?><svg xmlns=\"\"/>"),
            Some("image/svg+xml")
        );
        assert_eq!(sniff_mime(b"hello world"), None);
    }

    #[test]
    fn test_embed_png() {
        let uri = embed_image(PNG_HEADER, None).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        let payload = uri.trim_start_matches("data:image/png;base64,");
        assert_eq!(STANDARD.decode(payload).unwrap(), PNG_HEADER);
    }

    #[test]
    fn test_sniffed_type_wins_over_declared() {
        let uri = embed_image(PNG_HEADER, Some("image/jpeg")).unwrap();
        assert!(uri.starts_with("data:image/png;"));
    }

    #[test]
    fn test_declared_image_type_used_as_fallback() {
        let uri = embed_image(b"\0\0\0\x1cftypavif", Some("image/avif")).unwrap();
        assert!(uri.starts_with("data:image/avif;base64,"));
    }

    #[test]
    fn test_rejects_non_images() {
        assert!(matches!(embed_image(b"", None), Err(MediaError::Empty)));
        assert!(matches!(
            embed_image(b"plain text", Some("text/plain")),
            Err(MediaError::UnsupportedType(m)) if m == "text/plain"
        ));
        assert!(matches!(
            embed_image(b"plain text", None),
            Err(MediaError::UnsupportedType(m)) if m == "unknown"
        ));
    }

    #[tokio::test]
    async fn test_embed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.png");
        std::fs::write(&path, PNG_HEADER).unwrap();

        let uri = embed_image_file(&path).await.unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));

        let missing = embed_image_file(&dir.path().join("nope.png")).await;
        assert!(matches!(missing, Err(MediaError::Read { .. })));
    }
}
