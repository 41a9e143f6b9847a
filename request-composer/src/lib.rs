//! Request composition gateway with two public functions.
//!
//! Public API: [`compose_request`] and [`answer_question`]. Both take the
//! currently loaded OpenAPI document, build a prompt around it, call the
//! Google AI gateway, and post-process the reply: the composer extracts a
//! JSON request body, the analyzer returns plain text. Extraction is pure
//! and tolerant, so an unparseable reply degrades to verbatim text, never
//! to an error.

mod extract;
mod prompt;

mod api_types;
mod error;

pub use api_types::{AnalyzeParams, GenerateParams, GeneratedBody, GeneratedRequest, SpecAnswer};

pub use error::ComposerError;

pub use extract::{Presented, extract_json_object, present, strip_code_fences};

pub use prompt::{DEFAULT_MAX_SPEC_CHARS, build_analysis_prompt, build_generation_prompt};

use ai_gen_service::{GenAiService, GenerationRequest};
use spec_store::LoadedSpec;
use tracing::{debug, info};

/// Compose a JSON request body for the described API call.
///
/// Builds the generation prompt (operation index + clamped raw spec +
/// description), calls the model once, and extracts a JSON object from the
/// reply. When no object can be located or parsed, the result carries the
/// raw reply and a note instead; the caller decides how to render that.
///
/// # Errors
/// - [`ComposerError::EmptyDescription`] before any network activity
/// - [`ComposerError::Gen`] for gateway failures (missing/invalid key,
///   rate limits, transport, timeouts)
pub async fn compose_request(
    svc: &GenAiService,
    spec: &LoadedSpec,
    params: GenerateParams,
) -> Result<GeneratedRequest, ComposerError> {
    let description = params.description.trim();
    if description.is_empty() {
        return Err(ComposerError::EmptyDescription);
    }

    // 1) Build the prompt, clamping how much of the document gets inlined
    let budget = prompt::resolve_spec_budget(params.max_spec_chars);
    let text = prompt::build_generation_prompt(spec, description, budget);
    debug!(
        file = %spec.file_name,
        prompt_len = text.len(),
        budget,
        "generation prompt built"
    );

    // 2) One model call, no retries
    let req = GenerationRequest {
        prompt: text,
        model: params.model,
        api_key: params.api_key,
    };
    let raw = svc.generate(&req).await?;
    let model = req
        .model
        .unwrap_or_else(|| svc.default_model().to_string());

    // 3) Extract and package
    let presented = extract::present(&raw);
    info!(
        model = %model,
        parsed = matches!(&presented.body, GeneratedBody::Json(_)),
        "request body composed"
    );

    Ok(GeneratedRequest {
        model,
        body: presented.body,
        note: presented.note,
    })
}

/// Answer a free-text question about the loaded document.
///
/// Same pipeline as [`compose_request`] with an analysis prompt and no JSON
/// extraction: the answer is plain text.
///
/// # Errors
/// - [`ComposerError::EmptyQuestion`] before any network activity
/// - [`ComposerError::Gen`] for gateway failures
pub async fn answer_question(
    svc: &GenAiService,
    spec: &LoadedSpec,
    params: AnalyzeParams,
) -> Result<SpecAnswer, ComposerError> {
    let question = params.question.trim();
    if question.is_empty() {
        return Err(ComposerError::EmptyQuestion);
    }

    let budget = prompt::resolve_spec_budget(params.max_spec_chars);
    let text = prompt::build_analysis_prompt(spec, question, budget);
    debug!(
        file = %spec.file_name,
        prompt_len = text.len(),
        budget,
        "analysis prompt built"
    );

    let req = GenerationRequest {
        prompt: text,
        model: params.model,
        api_key: params.api_key,
    };
    let answer = svc.generate(&req).await?;
    let model = req
        .model
        .unwrap_or_else(|| svc.default_model().to_string());

    info!(model = %model, chars = answer.len(), "spec question answered");

    Ok(SpecAnswer {
        model,
        answer: answer.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_gen_service::GenAiConfig;

    const PETSTORE: &str = r#"
openapi: 3.0.0
info:
  title: Petstore
  version: 1.0.0
paths:
  /pet:
    post:
      operationId: addPet
      summary: Add a new pet to the store
      requestBody:
        required: true
        content:
          application/json:
            schema:
              type: object
              required: [name, status]
              properties:
                name:
                  type: string
                status:
                  type: string
"#;

    fn petstore() -> LoadedSpec {
        LoadedSpec::parse("petstore.yaml", PETSTORE).unwrap()
    }

    fn offline_service() -> GenAiService {
        GenAiService::new(GenAiConfig {
            model: "gemini-2.5-flash".to_string(),
            endpoint: "http://localhost:9".to_string(),
            api_key: Some("test-key".to_string()),
            max_output_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(1),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn empty_description_fails_before_any_network_call() {
        let svc = offline_service();
        let spec = petstore();
        let err = compose_request(
            &svc,
            &spec,
            GenerateParams {
                description: "   ".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ComposerError::EmptyDescription));
    }

    #[tokio::test]
    async fn empty_question_fails_before_any_network_call() {
        let svc = offline_service();
        let spec = petstore();
        let err = answer_question(&svc, &spec, AnalyzeParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ComposerError::EmptyQuestion));
    }

    #[test]
    fn prompt_and_presentation_cover_the_petstore_flow() {
        let spec = petstore();

        let text =
            build_generation_prompt(&spec, "add a new pet to the store", DEFAULT_MAX_SPEC_CHARS);
        assert!(text.contains("POST /pet"));
        assert!(text.contains("add a new pet to the store"));

        let presented = present("{\"name\":\"Fido\",\"status\":\"available\"}");
        assert!(presented.note.is_none());
        match presented.body {
            GeneratedBody::Json(v) => assert_eq!(
                serde_json::to_string(&v).unwrap(),
                r#"{"name":"Fido","status":"available"}"#
            ),
            GeneratedBody::Raw(_) => panic!("expected parsed JSON"),
        }
    }
}
