//! Embedded image payload encoding.
//!
//! Fetched favicon bytes are embedded as `data:` URIs so cached icons render
//! without further network access.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Media type used when the response carried none, or a non-image one.
const DEFAULT_MEDIA_TYPE: &str = "image/png";

/// Encode image bytes as a `data:` URI.
pub fn to_data_uri(bytes: &[u8], content_type: Option<&str>) -> String {
    let media_type = content_type
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .filter(|ct| ct.starts_with("image/"))
        .unwrap_or(DEFAULT_MEDIA_TYPE);

    format!("data:{media_type};base64,{}", STANDARD.encode(bytes))
}

/// Whether a string is already an embedded `data:` payload.
pub fn is_data_uri(s: &str) -> bool {
    s.starts_with("data:")
}
