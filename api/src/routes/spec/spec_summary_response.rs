use serde::Serialize;
use spec_store::LoadedSpec;

/// Response body describing the currently loaded OpenAPI document.
///
/// Returned by both the upload route and `GET /spec` so a client can render
/// the operation list and the model banner from either.
#[derive(Debug, Serialize)]
pub struct SpecSummaryResponse {
    /// File name exactly as uploaded.
    pub file_name: String,
    /// `info.title`, if the document has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `info.version`, if the document has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// `openapi` (3.x) or `swagger` (2.0) version marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openapi: Option<String>,
    /// Indexed operations in document order.
    pub operations: Vec<OperationItem>,
    /// Whether the document is small enough for the embedded viewer to
    /// render comfortably.
    pub viewer_friendly: bool,
    /// Model the service will use unless a request overrides it.
    pub model: String,
}

/// One operation row in the summary.
#[derive(Debug, Serialize)]
pub struct OperationItem {
    /// Display label like `POST /pet`.
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl SpecSummaryResponse {
    /// Build the response from a loaded document.
    pub fn from_spec(spec: &LoadedSpec, viewer_max_bytes: usize, model: &str) -> Self {
        Self {
            file_name: spec.file_name.clone(),
            title: spec.summary.title.clone(),
            version: spec.summary.version.clone(),
            openapi: spec.summary.openapi.clone(),
            operations: spec
                .summary
                .operations
                .iter()
                .map(|op| OperationItem {
                    label: op.label(),
                    operation_id: op.operation_id.clone(),
                    summary: op.summary.clone(),
                })
                .collect(),
            viewer_friendly: spec.raw.len() <= viewer_max_bytes,
            model: model.to_string(),
        }
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
"#;

    #[test]
    fn summary_response_labels_operations_and_flags_viewer_fit() {
        let spec = LoadedSpec::parse("petstore.yaml", PETSTORE).unwrap();

        let small = SpecSummaryResponse::from_spec(&spec, 1_000_000, "gemini-2.5-flash");
        assert_eq!(small.title.as_deref(), Some("Petstore"));
        assert_eq!(small.operations[0].label, "POST /pet");
        assert!(small.viewer_friendly);
        assert_eq!(small.model, "gemini-2.5-flash");

        let big = SpecSummaryResponse::from_spec(&spec, 10, "gemini-2.5-flash");
        assert!(!big.viewer_friendly);
    }
}
