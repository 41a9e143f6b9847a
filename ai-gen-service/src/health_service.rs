//! Health service for the Google AI backend.
//!
//! This module exposes a lightweight upstream probe:
//! - Google AI: `GET {endpoint}/v1beta/models/{model}` with the fallback key
//!
//! The returned [`HealthStatus`] is JSON-serializable and suitable for a
//! `/health` endpoint. [`HealthService::check`] is resilient and never fails
//! (errors mapped to `ok=false`). The provider-specific probe (`try_*`)
//! returns a strict `Result`.

use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::gen_ai_config::GenAiConfig;
use crate::error_handler::{GenAiError, ProviderError, make_snippet};
use crate::services::google_ai_service::API_KEY_HEADER;

/// Provider label reported in statuses and logs.
const PROVIDER: &str = "GoogleAI";

/// A serializable health snapshot for the configured backend.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Backend/provider label (`"GoogleAI"`).
    pub provider: String,
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier relevant to the probe (if any).
    pub model: Option<String>,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds for the main probe.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    #[inline]
    fn ok(
        endpoint: &str,
        model: Option<&str>,
        latency_ms: u128,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider: PROVIDER.to_string(),
            endpoint: endpoint.to_string(),
            model: model.map(str::to_string),
            ok: true,
            latency_ms,
            message: message.into(),
        }
    }

    #[inline]
    fn fail(
        endpoint: &str,
        model: Option<&str>,
        latency_ms: u128,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider: PROVIDER.to_string(),
            endpoint: endpoint.to_string(),
            model: model.map(str::to_string),
            ok: false,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Health checker that reuses a single HTTP client.
///
/// The client is constructed with a default timeout. Individual probes may
/// override the timeout per request based on the provided config.
pub struct HealthService {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds).
    ///
    /// # Errors
    /// Returns [`GenAiError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, GenAiError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        info!(
            default_timeout_secs = timeout.as_secs(),
            "HealthService initialized"
        );

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Checks upstream health for the given config.
    ///
    /// This method is **resilient**: it never returns an error. Any failure is
    /// converted to `HealthStatus { ok: false, message: ... }`, which is
    /// convenient for `/health`. Without a configured fallback key the probe
    /// is skipped (per-request keys are not health's business).
    pub async fn check(&self, cfg: &GenAiConfig) -> HealthStatus {
        // Quick endpoint validation to avoid obvious issues.
        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            warn!(
                endpoint = %cfg.endpoint,
                "invalid endpoint (empty or missing http/https)"
            );
            return HealthStatus::fail(
                endpoint,
                Some(&cfg.model),
                0,
                "endpoint is empty or missing http/https",
            );
        }

        if cfg.api_key.is_none() {
            debug!(endpoint = %cfg.endpoint, "no fallback API key; skipping upstream probe");
            return HealthStatus::fail(
                endpoint,
                Some(&cfg.model),
                0,
                "no API key configured (GOOGLE_AI_API_KEY); upstream probe skipped",
            );
        }

        let start = Instant::now();
        match self.try_probe_google(cfg).await {
            Ok(mut status) => {
                if status.latency_ms == 0 {
                    status.latency_ms = start.elapsed().as_millis();
                }
                info!(
                    endpoint = %status.endpoint,
                    model = %status.model.as_deref().unwrap_or("n/a"),
                    ok = status.ok,
                    latency_ms = status.latency_ms,
                    "health probe completed"
                );
                status
            }
            Err(err) => {
                let status = HealthStatus::fail(
                    &cfg.endpoint,
                    Some(&cfg.model),
                    start.elapsed().as_millis(),
                    err.to_string(),
                );
                warn!(
                    endpoint = %status.endpoint,
                    model = %status.model.as_deref().unwrap_or("n/a"),
                    latency_ms = status.latency_ms,
                    message = %status.message,
                    "health probe failed"
                );
                status
            }
        }
    }

    /// Strict Google AI probe. Returns an error on hard failures.
    ///
    /// Probe:
    /// - `GET {endpoint}/v1beta/models/{model}` with the fallback key
    /// - 2xx        → healthy (decode of the model resource is best-effort)
    /// - 404        → reachable, but the configured model is unknown
    /// - other non-2xx → hard failure
    async fn try_probe_google(&self, cfg: &GenAiConfig) -> Result<HealthStatus, GenAiError> {
        let url = format!(
            "{}/v1beta/models/{}",
            cfg.endpoint.trim_end_matches('/'),
            cfg.model
        );
        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout);
        let api_key = cfg.api_key.as_deref().unwrap_or_default();

        let start = Instant::now();
        debug!(
            provider = PROVIDER,
            endpoint = %cfg.endpoint,
            model = %cfg.model,
            "GET {}", url
        );

        let resp = self
            .client
            .get(&url)
            .timeout(timeout)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(GenAiError::from)?;

        let latency = start.elapsed().as_millis();

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(HealthStatus::fail(
                &cfg.endpoint,
                Some(&cfg.model),
                latency,
                "Google AI is up, but the configured model was not found",
            ));
        }

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                provider = PROVIDER,
                %url,
                %status,
                %snippet,
                latency_ms = latency,
                "health GET models/{{model}} returned non-success status"
            );

            return Err(GenAiError::Provider(ProviderError::HttpStatus {
                status,
                url,
                snippet,
            }));
        }

        // Expected minimal JSON: { "name": "models/<model>", ... }
        #[derive(serde::Deserialize)]
        struct ModelResource {
            name: Option<String>,
        }

        match resp.json::<ModelResource>().await {
            Ok(resource) => {
                let named = resource
                    .name
                    .is_some_and(|n| n.ends_with(cfg.model.as_str()));
                if named {
                    Ok(HealthStatus::ok(
                        &cfg.endpoint,
                        Some(&cfg.model),
                        latency,
                        "Google AI is healthy; model is available",
                    ))
                } else {
                    Ok(HealthStatus::ok(
                        &cfg.endpoint,
                        Some(&cfg.model),
                        latency,
                        "Google AI is healthy; model resource without matching `name`",
                    ))
                }
            }
            Err(e) => {
                warn!(
                    provider = PROVIDER,
                    endpoint = %cfg.endpoint,
                    model = %cfg.model,
                    error = %e,
                    latency_ms = latency,
                    "failed to decode model resource; treating server as reachable"
                );
                Ok(HealthStatus::ok(
                    &cfg.endpoint,
                    Some(&cfg.model),
                    latency,
                    format!("Google AI is reachable; failed to decode model resource: {e}"),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(endpoint: &str, api_key: Option<&str>) -> GenAiConfig {
        GenAiConfig {
            model: "gemini-2.5-flash".to_string(),
            endpoint: endpoint.to_string(),
            api_key: api_key.map(str::to_string),
            max_output_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(1),
        }
    }

    #[tokio::test]
    async fn missing_fallback_key_skips_the_probe() {
        let svc = HealthService::new(Some(1)).unwrap();
        let status = svc
            .check(&cfg("https://generativelanguage.googleapis.com", None))
            .await;
        assert!(!status.ok);
        assert!(status.message.contains("no API key configured"));
        assert_eq!(status.latency_ms, 0);
    }

    #[tokio::test]
    async fn invalid_endpoint_fails_without_probing() {
        let svc = HealthService::new(Some(1)).unwrap();
        let status = svc.check(&cfg("ftp://example.com", Some("k"))).await;
        assert!(!status.ok);
        assert!(status.message.contains("http/https"));
    }
}
