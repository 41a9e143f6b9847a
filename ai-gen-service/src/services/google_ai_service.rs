//! Google AI (Gemini) service for text generation and model discovery.
//!
//! Minimal, synchronous (non-streaming) client around the Generative
//! Language REST API. Endpoints are derived from `GenAiConfig::endpoint`:
//! - POST {endpoint}/v1beta/models/{model}:generateContent for text generation
//! - GET  {endpoint}/v1beta/models for model listing
//!
//! The API key travels in the `x-goog-api-key` request header, never in the
//! URL, so it cannot leak through request logs. Keys and model ids are
//! resolved per call: a request override wins over the configured fallback.
//!
//! Errors are normalized via unified error types in `error_handler`.

use std::time::{Duration, Instant};

use reqwest::{StatusCode, header};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::{
    config::gen_ai_config::GenAiConfig,
    error_handler::{GenAiError, ProviderError, make_snippet, validate_http_endpoint},
};

/// Request header carrying the API key.
pub(crate) const API_KEY_HEADER: &str = "x-goog-api-key";

/// Per-call inputs for [`GenAiService::generate`].
///
/// `model` and `api_key` override the config fallbacks when present.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    /// Full prompt text, sent as a single user part.
    pub prompt: String,
    /// Optional model id override (e.g., `gemini-2.5-pro`).
    pub model: Option<String>,
    /// Optional API key override.
    pub api_key: Option<String>,
}

/// One generation-capable model, as reported by the backend.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    /// Bare model id with the `models/` resource prefix stripped.
    pub name: String,
    /// Human-readable display name, if provided.
    pub display_name: Option<String>,
    /// Short description, if provided.
    pub description: Option<String>,
}

/// Thin client for the Google Generative Language API.
///
/// Constructed from a complete [`GenAiConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with timeout and default headers).
///
/// High-level operations:
/// - [`GenAiService::generate`] for single, non-streaming text generation
/// - [`GenAiService::list_models`] for generation-capable model discovery
#[derive(Debug)]
pub struct GenAiService {
    client: reqwest::Client,
    cfg: GenAiConfig,
    timeout: Duration,
}

impl GenAiService {
    /// Creates a new [`GenAiService`] from the given config.
    ///
    /// Validates the endpoint scheme and builds an HTTP client with the
    /// configured timeout. No API key is required at this point because the
    /// key is resolved per call.
    ///
    /// # Errors
    /// - [`GenAiError::Config`] if `cfg.endpoint` is not http(s)
    /// - [`GenAiError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: GenAiConfig) -> Result<Self, GenAiError> {
        validate_http_endpoint("GOOGLE_AI_ENDPOINT", cfg.endpoint.trim())?;

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            has_fallback_key = cfg.api_key.is_some(),
            "GenAiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            timeout,
        })
    }

    /// Model id used when a call does not pick one.
    pub fn default_model(&self) -> &str {
        &self.cfg.model
    }

    /// Performs a **non-streaming** `generateContent` call.
    ///
    /// The prompt is sent as a single user part; `generationConfig` carries
    /// the sampling options from config. Returns the concatenated text parts
    /// of the first candidate.
    ///
    /// # Errors
    /// - [`GenAiError::Provider`] with `MissingApiKey` if no key is available
    /// - [`GenAiError::Provider`] with `RateLimited` / `InvalidApiKey` /
    ///   `Server` / `HttpStatus` for non-2xx responses, classified from the
    ///   status and the Google error envelope
    /// - [`GenAiError::Timeout`] if the call exceeds the configured timeout
    /// - [`GenAiError::HttpTransport`] for other client/network failures
    /// - [`GenAiError::Provider`] with `Decode` / `EmptyCandidates` for
    ///   unusable response payloads
    pub async fn generate(&self, req: &GenerationRequest) -> Result<String, GenAiError> {
        let started = Instant::now();
        let model = req.model.as_deref().unwrap_or(&self.cfg.model);
        let api_key = self.resolve_key(req.api_key.as_deref())?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.cfg.endpoint.trim_end_matches('/'),
            model
        );

        let body = GenerateContentRequest::from_cfg(&self.cfg, &req.prompt);

        debug!(
            model = %model,
            endpoint = %self.cfg.endpoint,
            prompt_len = req.prompt.len(),
            override_key = req.api_key.is_some(),
            "POST {}", url
        );

        let resp = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let retry_after = retry_after_secs(resp.headers());
            let text = resp.text().await.unwrap_or_default();

            error!(
                %status,
                %url,
                model = %model,
                snippet = %make_snippet(&text),
                latency_ms = started.elapsed().as_millis(),
                "generateContent returned non-success status"
            );

            return Err(classify_failure(status, &url, &text, retry_after).into());
        }

        let out: GenerateContentResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    model = %model,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode generateContent response"
                );
                return Err(ProviderError::Decode(format!(
                    "serde error: {e}; expected `candidates[0].content.parts[].text`"
                ))
                .into());
            }
        };

        let text = out.first_text().ok_or_else(|| {
            warn!(model = %model, "generateContent response carried no text parts");
            ProviderError::EmptyCandidates
        })?;

        info!(
            model = %model,
            chars = text.len(),
            latency_ms = started.elapsed().as_millis(),
            "generateContent completed"
        );

        Ok(text)
    }

    /// Lists generation-capable models via `GET /v1beta/models`.
    ///
    /// Models without `generateContent` in their supported methods are
    /// filtered out, and the `models/` resource prefix is stripped from each
    /// name so the result can be fed straight back into [`Self::generate`].
    ///
    /// # Errors
    /// Same classification as [`Self::generate`] for non-2xx and transport
    /// failures; `Decode` if the listing payload cannot be parsed.
    pub async fn list_models(&self, api_key: Option<&str>) -> Result<Vec<ModelInfo>, GenAiError> {
        let started = Instant::now();
        let api_key = self.resolve_key(api_key)?;
        // Single page; 1000 comfortably covers the current catalog.
        let url = format!(
            "{}/v1beta/models?pageSize=1000",
            self.cfg.endpoint.trim_end_matches('/')
        );

        debug!(endpoint = %self.cfg.endpoint, "GET {}", url);

        let resp = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let retry_after = retry_after_secs(resp.headers());
            let text = resp.text().await.unwrap_or_default();

            error!(
                %status,
                %url,
                snippet = %make_snippet(&text),
                latency_ms = started.elapsed().as_millis(),
                "model listing returned non-success status"
            );

            return Err(classify_failure(status, &url, &text, retry_after).into());
        }

        let out: ListModelsResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode model listing response"
                );
                return Err(ProviderError::Decode(format!(
                    "serde error: {e}; expected `models[].name`"
                ))
                .into());
            }
        };

        let models: Vec<ModelInfo> = out
            .models
            .unwrap_or_default()
            .into_iter()
            .filter(ModelEntry::supports_generation)
            .map(|m| ModelInfo {
                name: m.bare_name().to_string(),
                display_name: m.display_name,
                description: m.description,
            })
            .collect();

        info!(
            count = models.len(),
            latency_ms = started.elapsed().as_millis(),
            "model listing completed"
        );

        Ok(models)
    }

    /// Per-call key resolution: request override first, config fallback next.
    fn resolve_key(&self, override_key: Option<&str>) -> Result<String, GenAiError> {
        override_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .or(self.cfg.api_key.as_deref())
            .map(str::to_string)
            .ok_or_else(|| ProviderError::MissingApiKey.into())
    }

    /// Maps client timeouts onto the dedicated variant.
    fn map_send_error(&self, e: reqwest::Error) -> GenAiError {
        if e.is_timeout() {
            GenAiError::Timeout(self.timeout)
        } else {
            GenAiError::HttpTransport(e)
        }
    }
}

/// Parses a `Retry-After` seconds value, if the header is present.
fn retry_after_secs(headers: &header::HeaderMap) -> Option<u64> {
    headers
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
}

/// Classifies a non-2xx response from the Generative Language API.
///
/// Reads the Google error envelope (`{"error":{"code","message","status"}}`)
/// when present and maps:
/// - HTTP 429 or `RESOURCE_EXHAUSTED` → [`ProviderError::RateLimited`]
/// - HTTP 401/403, `UNAUTHENTICATED`/`PERMISSION_DENIED`, or an
///   `INVALID_ARGUMENT` complaining about the API key
///   → [`ProviderError::InvalidApiKey`]
/// - HTTP 5xx → [`ProviderError::Server`]
/// - anything else → [`ProviderError::HttpStatus`]
fn classify_failure(
    status: StatusCode,
    url: &str,
    body: &str,
    retry_after_secs: Option<u64>,
) -> ProviderError {
    let envelope = serde_json::from_str::<GoogleErrorEnvelope>(body)
        .ok()
        .map(|e| e.error);
    let google_status = envelope
        .as_ref()
        .and_then(|e| e.status.as_deref())
        .unwrap_or_default();
    let message = envelope
        .as_ref()
        .and_then(|e| e.message.clone())
        .unwrap_or_else(|| make_snippet(body));

    if status == StatusCode::TOO_MANY_REQUESTS || google_status == "RESOURCE_EXHAUSTED" {
        return ProviderError::RateLimited { retry_after_secs };
    }

    let key_complaint = message.to_ascii_lowercase().contains("api key");
    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || google_status == "UNAUTHENTICATED"
        || google_status == "PERMISSION_DENIED"
        || (google_status == "INVALID_ARGUMENT" && key_complaint)
    {
        return ProviderError::InvalidApiKey(message);
    }

    if status.is_server_error() {
        return ProviderError::Server {
            status,
            snippet: make_snippet(body),
        };
    }

    ProviderError::HttpStatus {
        status,
        url: url.to_string(),
        snippet: make_snippet(body),
    }
}

/* ===========================================================================
HTTP payloads & options
======================================================================== */

/// Request body for `models/{model}:generateContent` (non-streaming).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl<'a> GenerateContentRequest<'a> {
    /// Builds a single-turn request from config sampling options and a prompt.
    fn from_cfg(cfg: &GenAiConfig, prompt: &'a str) -> Self {
        let generation_config = if cfg.temperature.is_none()
            && cfg.top_p.is_none()
            && cfg.max_output_tokens.is_none()
        {
            None
        } else {
            Some(GenerationConfig {
                temperature: cfg.temperature,
                top_p: cfg.top_p,
                max_output_tokens: cfg.max_output_tokens,
            })
        };

        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config,
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Sampling options mapped from [`GenAiConfig`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// Minimal response for `generateContent`.
///
/// `candidates` is absent entirely when the prompt is safety-blocked.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<CandidateOut>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if any.
    fn first_text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        let parts = candidate.content?.parts?;
        let mut text = String::new();
        for part in parts {
            if let Some(t) = part.text {
                text.push_str(&t);
            }
        }
        if text.is_empty() { None } else { Some(text) }
    }
}

#[derive(Debug, Deserialize)]
struct CandidateOut {
    content: Option<ContentOut>,
}

#[derive(Debug, Deserialize)]
struct ContentOut {
    parts: Option<Vec<PartOut>>,
}

#[derive(Debug, Deserialize)]
struct PartOut {
    text: Option<String>,
}

/// Minimal response for `GET /v1beta/models`.
#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    models: Option<Vec<ModelEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelEntry {
    /// Resource name, e.g. `models/gemini-2.5-flash`.
    name: String,
    display_name: Option<String>,
    description: Option<String>,
    supported_generation_methods: Option<Vec<String>>,
}

impl ModelEntry {
    fn supports_generation(&self) -> bool {
        self.supported_generation_methods
            .as_deref()
            .is_some_and(|methods| methods.iter().any(|m| m == "generateContent"))
    }

    fn bare_name(&self) -> &str {
        self.name.strip_prefix("models/").unwrap_or(&self.name)
    }
}

/// Error envelope returned by Google with non-2xx statuses.
#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: Option<String>,
    status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUOTA_BODY: &str = r#"{"error":{"code":429,"message":"You exceeded your current quota, please check your plan and billing details.","status":"RESOURCE_EXHAUSTED"}}"#;
    const BAD_KEY_BODY: &str = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;

    #[test]
    fn quota_exhaustion_classifies_as_rate_limited() {
        let err = classify_failure(
            StatusCode::TOO_MANY_REQUESTS,
            "http://x/v1beta/models/m:generateContent",
            QUOTA_BODY,
            Some(12),
        );
        assert!(matches!(
            err,
            ProviderError::RateLimited {
                retry_after_secs: Some(12)
            }
        ));
    }

    #[test]
    fn invalid_argument_about_the_key_classifies_as_invalid_key() {
        let err = classify_failure(StatusCode::BAD_REQUEST, "http://x", BAD_KEY_BODY, None);
        match err {
            ProviderError::InvalidApiKey(msg) => assert!(msg.contains("API key not valid")),
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn permission_denied_classifies_as_invalid_key() {
        let body = r#"{"error":{"code":403,"message":"The caller does not have permission","status":"PERMISSION_DENIED"}}"#;
        let err = classify_failure(StatusCode::FORBIDDEN, "http://x", body, None);
        assert!(matches!(err, ProviderError::InvalidApiKey(_)));
    }

    #[test]
    fn server_errors_keep_status_and_snippet() {
        let err = classify_failure(StatusCode::INTERNAL_SERVER_ERROR, "http://x", "boom", None);
        match err {
            ProviderError::Server { status, snippet } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(snippet, "boom");
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn other_statuses_fall_back_to_http_status() {
        let err = classify_failure(
            StatusCode::NOT_FOUND,
            "http://x/v1beta/models/nope:generateContent",
            "{}",
            None,
        );
        assert!(matches!(err, ProviderError::HttpStatus { .. }));
    }

    #[test]
    fn first_candidate_text_parts_are_concatenated() {
        let resp: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}],"role":"model"},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        assert_eq!(resp.first_text().as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn blocked_response_without_candidates_yields_no_text() {
        let resp: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert!(resp.first_text().is_none());
    }

    #[tokio::test]
    async fn unreachable_endpoint_surfaces_a_transport_error() {
        let svc = GenAiService::new(GenAiConfig {
            model: "gemini-2.5-flash".to_string(),
            endpoint: "http://localhost:9".to_string(),
            api_key: Some("test-key".to_string()),
            max_output_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(1),
        })
        .unwrap();

        let err = svc
            .generate(&GenerationRequest {
                prompt: "ping".to_string(),
                ..GenerationRequest::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GenAiError::HttpTransport(_) | GenAiError::Timeout(_)
        ));
    }

    #[test]
    fn model_entries_filter_and_strip_prefix() {
        let list: ListModelsResponse = serde_json::from_str(
            r#"{"models":[
                {"name":"models/gemini-2.5-flash","displayName":"Gemini 2.5 Flash","supportedGenerationMethods":["generateContent","countTokens"]},
                {"name":"models/embedding-001","supportedGenerationMethods":["embedContent"]}
            ]}"#,
        )
        .unwrap();
        let models: Vec<ModelEntry> = list
            .models
            .unwrap()
            .into_iter()
            .filter(ModelEntry::supports_generation)
            .collect();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].bare_name(), "gemini-2.5-flash");
    }
}
