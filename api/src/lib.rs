use std::sync::Arc;

pub mod core;
pub mod error_handler;
pub mod middleware_layer;
pub mod routes;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::info;

use crate::core::app_state::AppState;
use crate::error_handler::AppError;
use crate::middleware_layer::json_extractor::json_error_mapper;
use crate::routes::{
    analyze::analyze_route::analyze,
    generate::generate_route::generate,
    health::health_route::health,
    models::models_route::list_models,
    pages::pages_route::{index_page, viewer_page},
    spec::spec_route::{spec_raw, spec_summary, upload_spec},
};

pub async fn start() -> Result<(), AppError> {
    let state = Arc::new(AppState::from_env()?);
    let address = state.config.address.clone();
    let model = state.r#gen.default_model().to_string();

    let app = Router::new()
        .route("/", get(index_page))
        .route("/viewer", get(viewer_page))
        .route("/spec", post(upload_spec).get(spec_summary))
        .route("/spec/raw", get(spec_raw))
        .route("/models", get(list_models))
        .route("/generate", post(generate))
        .route("/analyze", post(analyze))
        .route("/health", get(health))
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state);

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(AppError::Bind)?;

    info!(%address, %model, "request creator API listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    // Wait for the Ctrl+C signal
    signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
}
