use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{info, instrument};

use spec_store::LoadedSpec;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::spec::{
        spec_summary_response::SpecSummaryResponse, upload_spec_request::UploadSpecRequest,
    },
};

/// HTTP endpoint for uploading an OpenAPI document.
///
/// Accepts `{ "file_name": ..., "content": ... }`, parses the YAML and
/// replaces whatever document was loaded before. The response carries the
/// derived summary so a client can render the operation list immediately.
#[instrument(name = "upload_spec_route", skip(state, body), fields(file = %body.file_name))]
pub async fn upload_spec(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UploadSpecRequest>,
) -> AppResult<Response> {
    let spec = LoadedSpec::parse(&body.file_name, &body.content)?;
    let stored = state.specs.replace(spec).await;

    info!(
        file = %stored.file_name,
        operations = stored.summary.operations.len(),
        "specification stored"
    );

    let summary = SpecSummaryResponse::from_spec(
        &stored,
        state.config.viewer_max_spec_bytes,
        state.r#gen.default_model(),
    );
    Ok(ApiResponse::success(summary).into_response_with_status(StatusCode::OK))
}

/// Summary of the currently loaded document.
pub async fn spec_summary(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let spec = state.specs.current().await.ok_or(AppError::SpecNotLoaded)?;

    let summary = SpecSummaryResponse::from_spec(
        &spec,
        state.config.viewer_max_spec_bytes,
        state.r#gen.default_model(),
    );
    Ok(ApiResponse::success(summary).into_response_with_status(StatusCode::OK))
}

/// Raw document text, byte-for-byte as uploaded.
///
/// Served as `text/plain` so the embedded Swagger viewer (and curl) can
/// fetch the YAML directly.
pub async fn spec_raw(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let spec = state.specs.current().await.ok_or(AppError::SpecNotLoaded)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        spec.raw.clone(),
    )
        .into_response())
}
