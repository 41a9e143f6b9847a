use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use ai_gen_service::{GenAiError, ProviderError};
use request_composer::ComposerError;
use spec_store::errors::SpecStoreError;

use crate::core::app_state::ConfigError;
use crate::core::http::response_envelope::ApiResponse;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("no OpenAPI document is loaded")]
    SpecNotLoaded,

    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
        hint: Option<String>,
    },
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // startup-only
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,

            // 4xx
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::SpecNotLoaded => StatusCode::CONFLICT,

            // custom mapped
            AppError::Http { status, .. } => *status,

            // 5xx
            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::SpecNotLoaded => "SPEC_NOT_LOADED",
            AppError::Http { code, .. } => code,
        }
    }

    fn hint(&self) -> Option<String> {
        match self {
            AppError::SpecNotLoaded => {
                Some("Upload an OpenAPI document via POST /spec first.".into())
            }
            AppError::Http { hint, .. } => hint.clone(),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let hint = self.hint();
        ApiResponse::<()>::error(code, self.to_string(), hint).into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Convert upload rejections to `AppError::Http` with precise HTTP status & code.
impl From<SpecStoreError> for AppError {
    fn from(err: SpecStoreError) -> Self {
        match err {
            SpecStoreError::UnsupportedExtension(name) => AppError::Http {
                status: StatusCode::BAD_REQUEST,
                code: "UNSUPPORTED_FILE_TYPE",
                message: format!("`{name}` is not a YAML document"),
                hint: Some("Upload a .yaml or .yml OpenAPI file.".into()),
            },
            SpecStoreError::EmptyDocument => AppError::Http {
                status: StatusCode::BAD_REQUEST,
                code: "EMPTY_DOCUMENT",
                message: "the uploaded document is empty".into(),
                hint: None,
            },
            SpecStoreError::Parse(e) => AppError::Http {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                code: "PARSE_ERROR",
                message: format!("the document is not valid YAML: {e}"),
                hint: Some("The position above points at the first invalid construct.".into()),
            },
        }
    }
}

impl From<ComposerError> for AppError {
    fn from(err: ComposerError) -> Self {
        match err {
            ComposerError::Gen(e) => AppError::from(e),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl From<GenAiError> for AppError {
    fn from(err: GenAiError) -> Self {
        match err {
            GenAiError::Config(e) => AppError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "CONFIG_ERROR",
                message: e.to_string(),
                hint: None,
            },
            GenAiError::Provider(e) => AppError::from(e),
            GenAiError::HttpTransport(e) => AppError::Http {
                status: StatusCode::BAD_GATEWAY,
                code: "UPSTREAM_ERROR",
                message: format!("could not reach Google AI: {e}"),
                hint: None,
            },
            GenAiError::Timeout(d) => AppError::Http {
                status: StatusCode::GATEWAY_TIMEOUT,
                code: "UPSTREAM_TIMEOUT",
                message: format!("Google AI did not answer within {}s", d.as_secs()),
                hint: Some(
                    "Retry, or raise GEN_TIMEOUT_SECS if large documents need more time.".into(),
                ),
            },
            // enum is non_exhaustive upstream
            other => AppError::Http {
                status: StatusCode::BAD_GATEWAY,
                code: "UPSTREAM_ERROR",
                message: other.to_string(),
                hint: None,
            },
        }
    }
}

/// Convert provider classifications one-to-one. Messages stay user-facing
/// and never echo the API key itself.
impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::MissingApiKey => AppError::Http {
                status: StatusCode::UNAUTHORIZED,
                code: "INVALID_API_KEY",
                message: "no Google AI API key was provided".into(),
                hint: Some(
                    "Send a key in the request body, the X-Api-Key header, or set GOOGLE_AI_API_KEY."
                        .into(),
                ),
            },
            ProviderError::InvalidApiKey(msg) => AppError::Http {
                status: StatusCode::UNAUTHORIZED,
                code: "INVALID_API_KEY",
                message: format!("Google AI rejected the API key: {msg}"),
                hint: None,
            },
            ProviderError::RateLimited { retry_after_secs } => AppError::Http {
                status: StatusCode::TOO_MANY_REQUESTS,
                code: "RATE_LIMITED",
                message: "API rate limit exceeded. Please wait a moment and try again.".into(),
                hint: Some(match retry_after_secs {
                    Some(s) => format!(
                        "This is common on the free tier. The backend asked to retry after {s}s."
                    ),
                    None => "This is common on the free tier. Wait for the quota window to reset \
                             before retrying."
                        .into(),
                }),
            },
            ProviderError::Server { status, snippet } => AppError::Http {
                status: StatusCode::BAD_GATEWAY,
                code: "UPSTREAM_ERROR",
                message: format!("Google AI server error (HTTP {}): {snippet}", status.as_u16()),
                hint: None,
            },
            ProviderError::HttpStatus {
                status,
                url,
                snippet,
            } => AppError::Http {
                status: StatusCode::BAD_GATEWAY,
                code: "UPSTREAM_ERROR",
                message: format!(
                    "unexpected HTTP {} from {url}: {snippet}",
                    status.as_u16()
                ),
                hint: None,
            },
            ProviderError::Decode(msg) => AppError::Http {
                status: StatusCode::BAD_GATEWAY,
                code: "UPSTREAM_ERROR",
                message: format!("could not decode the Google AI response: {msg}"),
                hint: None,
            },
            ProviderError::EmptyCandidates => AppError::Http {
                status: StatusCode::BAD_GATEWAY,
                code: "UPSTREAM_ERROR",
                message: "Google AI returned no usable text (the reply may have been blocked)"
                    .into(),
                hint: None,
            },
            // enum is non_exhaustive upstream
            other => AppError::Http {
                status: StatusCode::BAD_GATEWAY,
                code: "UPSTREAM_ERROR",
                message: other.to_string(),
                hint: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limits_keep_the_classic_message_and_free_tier_hint() {
        let err = AppError::from(GenAiError::Provider(ProviderError::RateLimited {
            retry_after_secs: Some(7),
        }));
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.error_code(), "RATE_LIMITED");
        assert_eq!(
            err.to_string(),
            "API rate limit exceeded. Please wait a moment and try again."
        );
        let hint = err.hint().unwrap();
        assert!(hint.contains("free tier"));
        assert!(hint.contains("7s"));
    }

    #[test]
    fn rejected_keys_map_to_401() {
        let err = AppError::from(GenAiError::Provider(ProviderError::InvalidApiKey(
            "API key not valid. Please pass a valid API key.".into(),
        )));
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.error_code(), "INVALID_API_KEY");
        assert!(err.to_string().contains("API key not valid"));
    }

    #[test]
    fn missing_key_comes_with_a_how_to_hint() {
        let err = AppError::from(GenAiError::Provider(ProviderError::MissingApiKey));
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert!(err.hint().unwrap().contains("GOOGLE_AI_API_KEY"));
    }

    #[test]
    fn yaml_parse_failures_map_to_422() {
        let parse_err = spec_store::LoadedSpec::parse("bad.yaml", "key: [unclosed")
            .expect_err("malformed YAML must not parse");
        let err = AppError::from(parse_err);
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }

    #[test]
    fn missing_spec_is_a_conflict_with_an_upload_hint() {
        let err = AppError::SpecNotLoaded;
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "SPEC_NOT_LOADED");
        assert!(err.hint().unwrap().contains("POST /spec"));
    }

    #[test]
    fn empty_inputs_become_bad_requests() {
        let err = AppError::from(ComposerError::EmptyDescription);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "BAD_REQUEST");
    }

    #[test]
    fn blocked_replies_map_to_502_upstream() {
        let err = AppError::from(GenAiError::Provider(ProviderError::EmptyCandidates));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.error_code(), "UPSTREAM_ERROR");
    }
}
