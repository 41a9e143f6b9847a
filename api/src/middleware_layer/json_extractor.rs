use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::core::http::response_envelope::ApiResponse;

async fn take_body(res: Response) -> (axum::http::response::Parts, Bytes) {
    let (parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    (parts, bytes)
}

fn guess_field_from_serde_msg(msg: &str) -> Option<&'static str> {
    for key in [
        "description",
        "question",
        "file_name",
        "content",
        "api_key",
        "model",
    ] {
        if msg.contains(key) {
            return Some(key);
        }
    }
    None
}

fn ensure_request_id(parts: &mut axum::http::response::Parts) -> String {
    if let Some(h) = parts.headers.get("X-Request-Id") {
        if let Ok(v) = h.to_str() {
            if !v.trim().is_empty() {
                return v.to_string();
            }
        }
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    let id = format!("req-{nanos}");
    if let Ok(value) = HeaderValue::from_str(&id) {
        parts.headers.insert("X-Request-Id", value);
    }
    id
}

/// Builds the envelope replacement for a plain rejection body.
///
/// Returns `None` when the body already carries the envelope (handler
/// errors must not be wrapped twice) or cannot be re-serialized.
fn rewrap_rejection(status: StatusCode, bytes: &[u8]) -> Option<Vec<u8>> {
    let original = String::from_utf8_lossy(bytes);

    if original.trim_start().starts_with("{\"success\"") {
        return None;
    }

    let hint = if let Some(field) = guess_field_from_serde_msg(&original) {
        Some(format!("Check the `{field}` field."))
    } else if original.contains("expected a map") || original.contains("expected struct") {
        Some("Expected a JSON object here (e.g. { \"field\": \"value\" }).".into())
    } else {
        None
    };

    let envelope = ApiResponse::<()>::error(
        if status == StatusCode::BAD_REQUEST {
            "BAD_REQUEST"
        } else {
            "UNPROCESSABLE_ENTITY"
        },
        original.trim(),
        hint,
    );

    serde_json::to_vec(&envelope).ok()
}

/// Rewraps axum's plain-text 400/422 extractor rejections into the JSON
/// envelope so malformed request bodies get the same shape as every other
/// error.
pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();

    // Only 400/422 get mapped; everything else passes through untouched.
    if !(status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY) {
        return res;
    }

    let (mut parts, bytes) = take_body(res).await;

    let Some(body) = rewrap_rejection(status, &bytes) else {
        return Response::from_parts(parts, Body::from(bytes));
    };

    let _req_id = ensure_request_id(&mut parts); // id goes in the header, not the body

    // The body was replaced; a stale length header would truncate it.
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    parts.headers.insert(
        axum::http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    Response::from_parts(parts, body.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_guessing_knows_the_request_vocabulary() {
        let msg = "Failed to deserialize the JSON body: missing field `description`";
        assert_eq!(guess_field_from_serde_msg(msg), Some("description"));
        assert_eq!(guess_field_from_serde_msg("something else entirely"), None);
    }

    #[test]
    fn plain_rejections_get_the_envelope_with_a_field_hint() {
        let plain = b"Failed to deserialize the JSON body into the target type: missing field `description` at line 1 column 2";
        let wrapped = rewrap_rejection(StatusCode::UNPROCESSABLE_ENTITY, plain).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&wrapped).unwrap();
        assert_eq!(v["success"], false);
        assert_eq!(v["error"]["code"], "UNPROCESSABLE_ENTITY");
        assert!(
            v["error"]["hint"]
                .as_str()
                .is_some_and(|h| h.contains("description"))
        );
    }

    #[test]
    fn enveloped_handler_errors_are_not_wrapped_twice() {
        let enveloped = br#"{"success":false,"error":{"code":"SPEC_NOT_LOADED","message":"no OpenAPI document is loaded"}}"#;
        assert!(rewrap_rejection(StatusCode::BAD_REQUEST, enveloped).is_none());
    }
}
