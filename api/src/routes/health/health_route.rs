use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    routes::health::health_response::HealthResponse,
};

/// Readiness probe.
///
/// Always answers 200; upstream problems (missing key, unreachable backend,
/// unknown model) show up as `ok: false` with a message in the payload.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let upstream = state.health.check(&state.gen_config).await;
    let spec_loaded = state.specs.is_loaded().await;

    ApiResponse::success(HealthResponse {
        upstream,
        spec_loaded,
    })
    .into_response_with_status(StatusCode::OK)
}
