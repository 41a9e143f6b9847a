//! Default Google AI config loaded strictly from environment variables.
//!
//! This module provides the convenience constructor for [`GenAiConfig`].
//! Every variable has a sensible default except the API key, which is
//! genuinely optional here: requests may carry their own key, so a missing
//! `GOOGLE_AI_API_KEY` only surfaces when a call arrives without one.
//!
//! # Environment variables
//!
//! - `GOOGLE_AI_ENDPOINT`    = API base URL (default: public Google endpoint)
//! - `GOOGLE_AI_MODEL`       = model id (default: `gemini-2.5-flash`)
//! - `GOOGLE_AI_API_KEY`     = fallback API key (optional)
//! - `GEN_MAX_OUTPUT_TOKENS` = optional max output tokens (u32)
//! - `GEN_TEMPERATURE`       = sampling temperature (default `0.2`)
//! - `GEN_TOP_P`             = optional nucleus sampling cutoff
//! - `GEN_TIMEOUT_SECS`      = request timeout in seconds (default `60`)

use crate::{
    config::gen_ai_config::GenAiConfig,
    error_handler::{
        GenAiError, env_opt_f32, env_opt_u32, env_opt_u64, env_or, validate_http_endpoint,
        validate_range_f32,
    },
};

/// Public Generative Language API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model used when neither env nor the request picks one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Constructs the default Google AI config from environment.
///
/// Low temperature by default: the primary workload is structured JSON
/// generation, not creative text.
///
/// # Errors
///
/// - [`GenAiError::Config`] if `GOOGLE_AI_ENDPOINT` is not http(s)
/// - [`GenAiError::Config`] if a numeric variable fails to parse or a
///   sampling parameter is out of range
pub fn config_google_default() -> Result<GenAiConfig, GenAiError> {
    let endpoint = env_or("GOOGLE_AI_ENDPOINT", DEFAULT_ENDPOINT);
    validate_http_endpoint("GOOGLE_AI_ENDPOINT", endpoint.trim())?;

    let model = env_or("GOOGLE_AI_MODEL", DEFAULT_MODEL);
    let api_key = std::env::var("GOOGLE_AI_API_KEY")
        .ok()
        .filter(|v| !v.trim().is_empty());

    let max_output_tokens = env_opt_u32("GEN_MAX_OUTPUT_TOKENS")?;

    let temperature = env_opt_f32("GEN_TEMPERATURE")?.or(Some(0.2));
    if let Some(t) = temperature {
        validate_range_f32("temperature", t, 0.0, 2.0)?;
    }

    let top_p = env_opt_f32("GEN_TOP_P")?;
    if let Some(p) = top_p {
        validate_range_f32("top_p", p, 0.0, 1.0)?;
    }

    let timeout_secs = env_opt_u64("GEN_TIMEOUT_SECS")?.or(Some(60));

    Ok(GenAiConfig {
        model,
        endpoint,
        api_key,
        max_output_tokens,
        temperature,
        top_p,
        timeout_secs,
    })
}
