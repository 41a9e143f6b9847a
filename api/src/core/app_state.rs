use ai_gen_service::{GenAiConfig, GenAiService, HealthService, config_google_default};
use spec_store::SpecStore;
use thiserror::Error;

use crate::error_handler::AppError;

const DEFAULT_VIEWER_MAX_SPEC_BYTES: usize = 1_000_000;

/// Errors raised while reading HTTP-layer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value in {var}: {reason}")]
    InvalidNumber { var: &'static str, reason: String },
}

/// HTTP-layer settings, read once at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Socket address the server binds to, e.g. "0.0.0.0:8080".
    pub address: String,
    /// Documents larger than this many bytes are flagged as heavy for the
    /// embedded viewer. `/viewer` still serves them, it just may render slowly.
    pub viewer_max_spec_bytes: usize,
}

impl ApiConfig {
    /// Load HTTP-layer settings from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let address = std::env::var("API_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into());

        let viewer_max_spec_bytes = match std::env::var("VIEWER_MAX_SPEC_BYTES") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::InvalidNumber {
                    var: "VIEWER_MAX_SPEC_BYTES",
                    reason: e.to_string(),
                })?,
            Err(_) => DEFAULT_VIEWER_MAX_SPEC_BYTES,
        };

        Ok(Self {
            address,
            viewer_max_spec_bytes,
        })
    }
}

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Client for the Google Generative Language API.
    pub r#gen: GenAiService,
    /// Upstream reachability prober backing `/health`.
    pub health: HealthService,
    /// Holds the single currently loaded OpenAPI document.
    pub specs: SpecStore,
    /// Generation settings the service was started with.
    pub gen_config: GenAiConfig,
    /// HTTP-layer settings.
    pub config: ApiConfig,
}

impl AppState {
    /// Load shared state from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        let config = ApiConfig::from_env()?;
        let gen_config = config_google_default()?;
        let r#gen = GenAiService::new(gen_config.clone())?;
        let health = HealthService::new(gen_config.timeout_secs)?;

        Ok(Self {
            r#gen,
            health,
            specs: SpecStore::new(),
            gen_config,
            config,
        })
    }
}
