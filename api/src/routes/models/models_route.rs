use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::instrument;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    routes::{header_api_key, models::models_response::ModelsResponse},
};

/// Models available for text generation.
///
/// Accepts an optional `X-Api-Key` header so a client can browse models
/// before committing a key to the environment.
#[instrument(name = "list_models_route", skip(state, headers))]
pub async fn list_models(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let key_override = header_api_key(&headers);
    let models = state.r#gen.list_models(key_override.as_deref()).await?;

    let body = ModelsResponse {
        default_model: state.r#gen.default_model().to_string(),
        models,
    };
    Ok(ApiResponse::success(body).into_response_with_status(StatusCode::OK))
}
