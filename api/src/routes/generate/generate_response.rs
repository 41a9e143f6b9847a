use request_composer::GeneratedBody;
use serde::Serialize;

/// Response body carrying the generated request body.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// Model that produced the reply.
    pub model: String,
    /// Parsed JSON when extraction succeeded, raw reply text otherwise.
    pub body: GeneratedBody,
    /// Present when the reply had to be returned raw.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
