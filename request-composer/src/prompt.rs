//! Prompt builders: generation and analysis prompts around the loaded spec.

use std::fmt::Write as _;

use spec_store::LoadedSpec;

/// Default char budget for inlining the raw spec into a prompt.
pub const DEFAULT_MAX_SPEC_CHARS: usize = 30_000;

/// Effective spec budget: an explicit value wins, then `MAX_SPEC_PROMPT_CHARS`
/// from env, then [`DEFAULT_MAX_SPEC_CHARS`].
pub fn resolve_spec_budget(explicit: usize) -> usize {
    if explicit != 0 {
        return explicit;
    }
    std::env::var("MAX_SPEC_PROMPT_CHARS")
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n != 0)
        .unwrap_or(DEFAULT_MAX_SPEC_CHARS)
}

/// Build the request-body generation prompt.
///
/// Layout:
/// - role line demanding a valid JSON request body
/// - operation index derived from the parsed tree (`POST /pet` references)
/// - the raw spec in a fenced block, clamped to `max_chars`
/// - the user's description, quoted
/// - output contract: JSON only, realistic example values, parameters
///   in JSON form for body-less operations
pub fn build_generation_prompt(spec: &LoadedSpec, description: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(spec.raw.len().min(max_chars) + 1024);
    out.push_str(
        "You are an expert API assistant. Based on the following OpenAPI 3.0 specification, \
         generate a valid JSON request body for the operation that matches the user's request.\n\n",
    );

    push_operation_index(&mut out, spec);
    push_spec_block(&mut out, spec, max_chars);

    let _ = writeln!(
        out,
        "User Request: Generate a request for the operation: \"{}\"",
        description.trim()
    );
    out.push('\n');
    out.push_str(
        "Generate only the JSON request body with realistic example values. If the operation \
         does not have a request body (e.g., for a GET request), list its parameters (path, \
         query) and example values in JSON format.\n",
    );
    out.push_str("Return ONLY the JSON object (no markdown, no comments).\n");
    out
}

/// Build the spec-analysis prompt for free-text questions.
pub fn build_analysis_prompt(spec: &LoadedSpec, question: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(spec.raw.len().min(max_chars) + 512);
    out.push_str(
        "You are an expert API documentation analyst. Answer the user's question using only \
         the OpenAPI specification below.\n\n",
    );

    push_operation_index(&mut out, spec);
    push_spec_block(&mut out, spec, max_chars);

    let _ = writeln!(out, "Question: \"{}\"", question.trim());
    out.push('\n');
    out.push_str(
        "Answer concisely in plain text. If the specification does not contain the answer, \
         say so.\n",
    );
    out
}

/// Append the `METHOD /path` index so the model can ground its choice of
/// operation without scanning the whole document.
fn push_operation_index(out: &mut String, spec: &LoadedSpec) {
    if spec.summary.operations.is_empty() {
        return;
    }
    out.push_str("Operations defined in the specification:\n");
    for op in &spec.summary.operations {
        out.push_str("- ");
        out.push_str(&op.label());
        if let Some(id) = &op.operation_id {
            let _ = write!(out, " ({id})");
        }
        if let Some(s) = &op.summary {
            let _ = write!(out, ": {s}");
        }
        out.push('\n');
    }
    out.push('\n');
}

/// Append the raw YAML in a fenced block, clamped at a char boundary.
fn push_spec_block(out: &mut String, spec: &LoadedSpec, max_chars: usize) {
    out.push_str("OpenAPI Specification:\n```yaml\n");
    let body = spec.raw.trim_end();
    if body.len() > max_chars {
        out.push_str(safe_truncate(body, max_chars));
        out.push_str("\n# [truncated]\n");
    } else {
        out.push_str(body);
        out.push('\n');
    }
    out.push_str("```\n\n");
}

fn safe_truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        s
    } else {
        let mut end = max;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn generation_prompt_references_operation_and_description() {
        let spec = petstore();
        let prompt =
            build_generation_prompt(&spec, "add a new pet to the store", DEFAULT_MAX_SPEC_CHARS);

        assert!(prompt.contains("POST /pet"));
        assert!(prompt.contains("add a new pet to the store"));
        assert!(prompt.contains("```yaml"));
        assert!(prompt.contains("Generate only the JSON request body"));
    }

    #[test]
    fn oversized_specs_are_clamped_with_a_marker() {
        let mut spec = petstore();
        spec.raw = "x".repeat(500);
        let prompt = build_generation_prompt(&spec, "anything", 100);

        assert!(prompt.contains("# [truncated]"));
        // The fenced block carries at most the budget plus the marker.
        let yaml_start = prompt.find("```yaml\n").unwrap();
        let yaml_end = prompt.rfind("```").unwrap();
        assert!(yaml_end - yaml_start < 200);
    }

    #[test]
    fn clamping_respects_char_boundaries() {
        let mut spec = petstore();
        spec.raw = "é".repeat(300);
        // Odd budget lands mid-character for two-byte chars.
        let prompt = build_generation_prompt(&spec, "anything", 101);
        assert!(prompt.contains("# [truncated]"));
    }

    #[test]
    fn analysis_prompt_quotes_the_question() {
        let spec = petstore();
        let prompt = build_analysis_prompt(&spec, "Which operations exist?", 1000);

        assert!(prompt.contains("Question: \"Which operations exist?\""));
        assert!(prompt.contains("POST /pet"));
    }

    #[test]
    fn budget_resolution_prefers_explicit_value() {
        assert_eq!(resolve_spec_budget(1234), 1234);
    }
}
