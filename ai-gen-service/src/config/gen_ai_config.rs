/// Configuration for Google AI (Gemini) invocations.
///
/// This struct contains the connection target plus sampling parameters.
/// Everything except `model` and `endpoint` is optional; per-call overrides
/// (key, model) take precedence over the values here.
///
/// # Fields
///
/// - `model`: The model identifier (e.g., `"gemini-2.5-flash"`).
/// - `endpoint`: Base URL of the Generative Language API.
/// - `api_key`: Fallback API key; calls may carry their own instead.
/// - `max_output_tokens`: Maximum number of tokens to generate (if set).
/// - `temperature`: Controls randomness (0.0 = deterministic).
/// - `top_p`: Nucleus sampling cutoff (alternative to temperature).
/// - `timeout_secs`: Optional request timeout in seconds.
#[derive(Debug, Clone)]
pub struct GenAiConfig {
    /// Model identifier string (e.g., `"gemini-2.5-flash"`).
    pub model: String,

    /// API base URL (e.g., `https://generativelanguage.googleapis.com`).
    pub endpoint: String,

    /// Fallback API key used when a call does not bring its own.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_output_tokens: Option<u32>,

    /// Sampling temperature (controls creativity).
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
