use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Universal response envelope for both success and error (simplified).
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

#[derive(Serialize)]
pub struct ApiError {
    /// Stable, machine-readable error code (e.g. "SPEC_NOT_LOADED").
    pub code: &'static str,
    /// Human-friendly error message.
    pub message: String,
    /// Optional hint to help the client fix the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Build a success envelope.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Build an error envelope.
    pub fn error(code: &'static str, message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
                hint,
            }),
        }
    }

    /// Convert to axum Response.
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_omits_the_error_field() {
        let v = serde_json::to_value(ApiResponse::success(serde_json::json!({"ok": 1})))
            .unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["data"]["ok"], 1);
        assert!(v.get("error").is_none());
    }

    #[test]
    fn error_envelope_carries_code_message_and_hint() {
        let v = serde_json::to_value(ApiResponse::<()>::error(
            "RATE_LIMITED",
            "API rate limit exceeded. Please wait a moment and try again.",
            Some("This is common on the free tier.".into()),
        ))
        .unwrap();
        assert_eq!(v["success"], false);
        assert!(v.get("data").is_none());
        assert_eq!(v["error"]["code"], "RATE_LIMITED");
        assert_eq!(
            v["error"]["hint"],
            "This is common on the free tier."
        );
    }

    #[test]
    fn error_envelope_without_hint_omits_the_field() {
        let v = serde_json::to_value(ApiResponse::<()>::error("BAD_REQUEST", "nope", None))
            .unwrap();
        assert!(v["error"].get("hint").is_none());
    }
}
