use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::{info, instrument};

use request_composer::{AnalyzeParams, answer_question};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::{
        analyze::{analyze_request::AnalyzeRequest, analyze_response::AnalyzeResponse},
        header_api_key,
    },
};

/// HTTP endpoint answering free-text questions about the loaded document.
///
/// Same key resolution as the generate route; the answer is plain text and
/// the model is told to admit when the document does not contain it.
#[instrument(name = "analyze_route", skip(state, headers, body))]
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<AnalyzeRequest>,
) -> AppResult<Response> {
    let spec = state.specs.current().await.ok_or(AppError::SpecNotLoaded)?;

    let api_key = body.api_key.or_else(|| header_api_key(&headers));
    let params = AnalyzeParams {
        question: body.question,
        model: body.model,
        api_key,
        ..AnalyzeParams::default()
    };

    info!(file = %spec.file_name, "starting specification analysis");
    let answer = answer_question(&state.r#gen, &spec, params).await?;

    let resp = AnalyzeResponse {
        model: answer.model,
        answer: answer.answer,
    };
    Ok(ApiResponse::success(resp).into_response_with_status(StatusCode::OK))
}
