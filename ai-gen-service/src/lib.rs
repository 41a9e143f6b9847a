//! Google AI (Gemini) gateway for the request builder backend.
//!
//! Exposes a thin, non-streaming client for the Generative Language API
//! ([`GenAiService`]), environment-driven configuration, a resilient health
//! probe, and unified error types. The API key always travels in the
//! `x-goog-api-key` header (never in the URL), and every call may carry its
//! own key and model; the config only provides fallbacks.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod services;

pub use config::default_config::config_google_default;
pub use config::gen_ai_config::GenAiConfig;
pub use error_handler::{ConfigError, GenAiError, ProviderError};
pub use health_service::{HealthService, HealthStatus};
pub use services::google_ai_service::{GenAiService, GenerationRequest, ModelInfo};
