use crate::BodySnippetConfig;
use http::HeaderMap;

pub(crate) fn request_id(headers: &HeaderMap) -> Option<Box<str>> {
    for name in ["x-request-id", "x-correlation-id", "x-amzn-requestid"] {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string().into_boxed_str());
            }
        }
    }
    None
}

/// Error text from a JSON error body, if it has one.
pub(crate) fn extract_message(body: &[u8]) -> Option<Box<str>> {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) else {
        return None;
    };

    let candidates = ["error_message", "message", "error", "error_code"];
    for key in candidates {
        if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
            let msg = msg.trim();
            if !msg.is_empty() {
                return Some(msg.to_string().into_boxed_str());
            }
        }
    }
    None
}

pub(crate) fn body_snippet(body: &[u8], config: BodySnippetConfig) -> Option<Box<str>> {
    if !config.enabled || body.is_empty() {
        return None;
    }

    let body = String::from_utf8_lossy(body);
    Some(truncate_utf8(&body, config.max_bytes).into())
}

pub(crate) fn truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes.min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
