use axum::http::HeaderMap;

pub mod analyze;
pub mod generate;
pub mod health;
pub mod models;
pub mod pages;
pub mod spec;

/// Per-request API key override from the `X-Api-Key` header.
///
/// Keys never appear in URLs or logs; headers are the only transport.
pub(crate) fn header_api_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get("X-Api-Key")
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn header_keys_are_trimmed_and_blank_values_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_static("  abc123  "));
        assert_eq!(header_api_key(&headers).as_deref(), Some("abc123"));

        let mut blank = HeaderMap::new();
        blank.insert("x-api-key", HeaderValue::from_static("   "));
        assert_eq!(header_api_key(&blank), None);

        assert_eq!(header_api_key(&HeaderMap::new()), None);
    }
}
