//! Typed error for the request-composer crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposerError {
    /// The user sent an empty request description.
    #[error("request description must not be empty")]
    EmptyDescription,

    /// The user sent an empty question.
    #[error("question must not be empty")]
    EmptyQuestion,

    /// Errors from the underlying Google AI gateway.
    #[error("generation error: {0}")]
    Gen(#[from] ai_gen_service::GenAiError),
}
