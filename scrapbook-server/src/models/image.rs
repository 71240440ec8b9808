//! Image input parsing
//!
//! The `image` field of a create/update request is either an
//! already-resolved URL or an inline payload (data URI or bare base64).
//! The variant is decided once here at the boundary; downstream code
//! matches on the tagged union instead of re-sniffing string prefixes.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::ValidationError;

/// Content types accepted for inline payloads, with object-key extensions.
const EXTENSIONS: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

/// Decoded inline image ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlinePayload {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub extension: &'static str,
}

/// Image field of a request, decided once at the boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    /// Already-resolved URL, stored verbatim without touching the uploader
    Url(String),

    /// Inline payload to resolve through the uploader before persistence
    Inline(InlinePayload),
}

impl ImageInput {
    /// Parse an image request field.
    ///
    /// - `http://` / `https://` strings are resolved URLs
    /// - `data:<mime>;base64,<payload>` URIs decode to an inline payload
    /// - anything else must be bare base64, treated as JPEG
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        if value.starts_with("http://") || value.starts_with("https://") {
            return Ok(Self::Url(value.to_owned()));
        }

        if let Some(rest) = value.strip_prefix("data:") {
            let (mime, payload) =
                rest.split_once(";base64,")
                    .ok_or(ValidationError::InvalidFormat {
                        field: "image",
                        reason: "data URI must be base64-encoded",
                    })?;
            return Ok(Self::Inline(InlinePayload {
                bytes: decode(payload)?,
                content_type: mime.to_owned(),
                extension: extension_for(mime)?,
            }));
        }

        Ok(Self::Inline(InlinePayload {
            bytes: decode(value)?,
            content_type: "image/jpeg".to_owned(),
            extension: "jpg",
        }))
    }
}

fn extension_for(mime: &str) -> Result<&'static str, ValidationError> {
    EXTENSIONS
        .iter()
        .find(|(known, _)| *known == mime)
        .map(|(_, ext)| *ext)
        .ok_or(ValidationError::InvalidFormat {
            field: "image",
            reason: "unsupported image content type",
        })
}

fn decode(payload: &str) -> Result<Vec<u8>, ValidationError> {
    BASE64
        .decode(payload)
        .map_err(|_| ValidationError::InvalidFormat {
            field: "image",
            reason: "not a URL, data URI, or base64 payload",
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    // JPEG magic bytes, base64-encoded
    const JPEG_B64: &str = "/9j/4AAQSkZJRg==";

    #[test]
    fn url_passes_through() {
        let input = ImageInput::parse("https://cdn.example.com/x.jpg").unwrap();
        assert_eq!(
            input,
            ImageInput::Url("https://cdn.example.com/x.jpg".to_owned())
        );

        assert!(matches!(
            ImageInput::parse("http://cdn.example.com/x.jpg").unwrap(),
            ImageInput::Url(_)
        ));
    }

    #[test]
    fn bare_base64_decodes_as_jpeg() {
        let ImageInput::Inline(payload) = ImageInput::parse(JPEG_B64).unwrap() else {
            panic!("expected inline payload");
        };
        assert_eq!(payload.bytes[..2], [0xFF, 0xD8]);
        assert_eq!(payload.content_type, "image/jpeg");
        assert_eq!(payload.extension, "jpg");
    }

    #[test]
    fn data_uri_carries_content_type() {
        let uri = format!("data:image/png;base64,{}", BASE64.encode([1u8, 2, 3]));
        let ImageInput::Inline(payload) = ImageInput::parse(&uri).unwrap() else {
            panic!("expected inline payload");
        };
        assert_eq!(payload.bytes, vec![1, 2, 3]);
        assert_eq!(payload.content_type, "image/png");
        assert_eq!(payload.extension, "png");
    }

    #[test]
    fn unsupported_content_type_rejected() {
        let uri = format!("data:text/plain;base64,{}", BASE64.encode(b"hi"));
        let err = ImageInput::parse(&uri).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidFormat { field: "image", .. }
        ));
    }

    #[test]
    fn garbage_rejected() {
        assert!(ImageInput::parse("not base64 at all!").is_err());
        assert!(ImageInput::parse("data:image/png,rawdata").is_err());
    }
}
