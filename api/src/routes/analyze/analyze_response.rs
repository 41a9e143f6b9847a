use serde::Serialize;

/// Response body for a specification question.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Model that produced the answer.
    pub model: String,
    /// Plain-text answer.
    pub answer: String,
}
