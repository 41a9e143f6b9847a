//! Public API types re-used by external crates (e.g., the HTTP API layer).

use serde::Serialize;

/// Inputs for a single request-body composition.
///
/// Optional fields fall back to env-config or service defaults. Setting
/// `max_spec_chars` to `0` means: "use the value from env-config".
#[derive(Clone, Debug, Default)]
pub struct GenerateParams {
    /// Natural-language description of the desired API call.
    pub description: String,
    /// Optional model id override (service default otherwise).
    pub model: Option<String>,
    /// Optional API key override (configured fallback otherwise).
    pub api_key: Option<String>,
    /// Char budget for inlining the raw spec into the prompt.
    /// If `0`, falls back to `MAX_SPEC_PROMPT_CHARS` from env.
    pub max_spec_chars: usize,
}

/// Inputs for a single free-text question about the loaded spec.
#[derive(Clone, Debug, Default)]
pub struct AnalyzeParams {
    /// The user's question.
    pub question: String,
    /// Optional model id override.
    pub model: Option<String>,
    /// Optional API key override.
    pub api_key: Option<String>,
    /// Spec char budget; `0` falls back to env-config.
    pub max_spec_chars: usize,
}

/// Body extracted from the model reply.
///
/// Serialized with an explicit tag so clients never have to guess whether
/// they received parsed JSON or a verbatim fallback.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GeneratedBody {
    /// The reply contained a parseable JSON object.
    Json(serde_json::Value),
    /// No JSON object could be located or parsed; raw reply text, verbatim.
    Raw(String),
}

/// Final outcome of one composition run.
#[derive(Clone, Debug, Serialize)]
pub struct GeneratedRequest {
    /// Model that produced the reply.
    pub model: String,
    /// Extracted request body, or the raw text fallback.
    pub body: GeneratedBody,
    /// Present when the reply could not be parsed as JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Final answer for a spec question.
#[derive(Clone, Debug, Serialize)]
pub struct SpecAnswer {
    /// Model that produced the answer.
    pub model: String,
    /// Plain-text answer.
    pub answer: String,
}
