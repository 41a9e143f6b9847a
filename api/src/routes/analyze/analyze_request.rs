use serde::Deserialize;

/// Request body for asking a question about the loaded document.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Question in plain language, e.g. "which operations require auth?".
    pub question: String,
    /// Model override; the configured default applies when absent.
    #[serde(default)]
    pub model: Option<String>,
    /// Per-request API key; falls back to `X-Api-Key`, then the environment.
    #[serde(default)]
    pub api_key: Option<String>,
}
