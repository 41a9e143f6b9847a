use serde::Deserialize;

/// Request body for generating a JSON request body from a description.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Natural-language description of the desired call, e.g.
    /// "add a new pet to the store".
    pub description: String,
    /// Model override; the configured default applies when absent.
    #[serde(default)]
    pub model: Option<String>,
    /// Per-request API key; falls back to `X-Api-Key`, then the environment.
    #[serde(default)]
    pub api_key: Option<String>,
}
