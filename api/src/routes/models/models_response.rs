use ai_gen_service::ModelInfo;
use serde::Serialize;

/// Response body listing models usable for generation.
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    /// Current default; clients preselect it in the picklist.
    pub default_model: String,
    /// Models advertising `generateContent` support, name prefix stripped.
    pub models: Vec<ModelInfo>,
}
