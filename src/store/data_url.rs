//! `data:` URLs carrying inlined pixels in compatibility mode.

use base64::{Engine, engine::general_purpose::STANDARD};

/// Encodes bytes as `data:{content_type};base64,...`.
///
/// ```
/// use keepsake::store::data_url::{encode_data_url, decode_data_url};
///
/// let url = encode_data_url("image/jpeg", b"\xff\xd8");
/// assert_eq!(url, "data:image/jpeg;base64,/9g=");
/// let (ct, bytes) = decode_data_url(&url).unwrap();
/// assert_eq!(ct, "image/jpeg");
/// assert_eq!(bytes, b"\xff\xd8");
/// ```
pub fn encode_data_url(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{content_type};base64,{}", STANDARD.encode(bytes))
}

/// Decodes a base64 `data:` URL into its content type and bytes.
///
/// Returns `None` for anything that is not a base64 data URL.
pub fn decode_data_url(url: &str) -> Option<(String, Vec<u8>)> {
    let rest = url.trim().strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let content_type = header.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    let content_type = if content_type.is_empty() {
        "application/octet-stream"
    } else {
        content_type
    };
    Some((content_type.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_data_urls() {
        assert_eq!(decode_data_url("blob:http://x/123"), None);
        assert_eq!(decode_data_url("data:image/png,rawtext"), None);
        assert_eq!(decode_data_url("data:image/png;base64,@@@"), None);
        assert_eq!(decode_data_url(""), None);
    }

    #[test]
    fn missing_content_type_defaults() {
        let (ct, bytes) = decode_data_url("data:;base64,AAE=").unwrap();
        assert_eq!(ct, "application/octet-stream");
        assert_eq!(bytes, vec![0, 1]);
    }
}
