use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::{debug, info, instrument};

use request_composer::{GenerateParams, compose_request};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::{
        generate::{generate_request::GenerateRequest, generate_response::GenerateResponse},
        header_api_key,
    },
};

/// HTTP endpoint turning a natural-language description into a JSON request
/// body for the loaded OpenAPI document.
///
/// The API key is resolved body field first, then the `X-Api-Key` header;
/// the service falls back to its configured key when neither is present.
/// Replies that cannot be parsed as JSON still come back 200, raw, with a
/// note saying why.
#[instrument(name = "generate_route", skip(state, headers, body))]
pub async fn generate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<GenerateRequest>,
) -> AppResult<Response> {
    if let Some(id) = headers.get("X-Request-Id").and_then(|h| h.to_str().ok()) {
        debug!(%id, "request id attached");
    }

    let spec = state.specs.current().await.ok_or(AppError::SpecNotLoaded)?;

    let api_key = body.api_key.or_else(|| header_api_key(&headers));
    let params = GenerateParams {
        description: body.description,
        model: body.model,
        api_key,
        ..GenerateParams::default()
    };

    info!(file = %spec.file_name, "starting request generation");
    let generated = compose_request(&state.r#gen, &spec, params).await?;

    let resp = GenerateResponse {
        model: generated.model,
        body: generated.body,
        note: generated.note,
    };
    Ok(ApiResponse::success(resp).into_response_with_status(StatusCode::OK))
}
