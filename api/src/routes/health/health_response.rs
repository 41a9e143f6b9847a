use ai_gen_service::HealthStatus;
use serde::Serialize;

/// Response body for the readiness probe.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Upstream probe result; failures are described here, never as HTTP
    /// errors.
    pub upstream: HealthStatus,
    /// Whether an OpenAPI document is currently loaded.
    pub spec_loaded: bool,
}
