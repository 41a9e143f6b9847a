//! In-memory store for the uploaded OpenAPI document.
//!
//! - Parses user-supplied YAML into a generic `serde_yaml::Value` tree; no
//!   schema is enforced, downstream consumers must tolerate absent keys.
//! - Derives a compact operation index (`POST /pet`, operation id, summary)
//!   used by prompt building and the summary view.
//! - Keeps the current document in one shared slot; a new upload replaces
//!   the previous one and nothing is ever persisted.

use std::sync::Arc;

use serde::Serialize;
use serde_yaml::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

pub mod errors;

use errors::{Result, SpecStoreError};

/// HTTP methods recognized while walking the `paths` mapping.
const METHODS: [&str; 8] = [
    "get", "post", "put", "patch", "delete", "head", "options", "trace",
];

/// One uploaded OpenAPI document, parsed and summarized.
#[derive(Debug, Clone)]
pub struct LoadedSpec {
    /// File name exactly as supplied by the upload.
    pub file_name: String,
    /// Raw document text, byte-for-byte as uploaded.
    pub raw: String,
    /// Parsed YAML tree. Generic on purpose: no schema validation here.
    pub root: Value,
    /// Summary derived from `root` with missing-key-tolerant lookups.
    pub summary: SpecSummary,
}

impl LoadedSpec {
    /// Parse an uploaded document.
    ///
    /// Rejects non-YAML extensions and empty payloads before touching the
    /// parser. On a YAML error nothing is stored and the error carries the
    /// parser's own message (line/column included) for display.
    #[instrument(skip(content), fields(file = %file_name, bytes = content.len()))]
    pub fn parse(file_name: &str, content: &str) -> Result<Self> {
        if !has_yaml_extension(file_name) {
            return Err(SpecStoreError::UnsupportedExtension(file_name.to_string()));
        }
        if content.trim().is_empty() {
            return Err(SpecStoreError::EmptyDocument);
        }

        let root: Value = serde_yaml::from_str(content)?;
        let summary = SpecSummary::derive(&root);

        info!(
            file = %file_name,
            title = %summary.title.as_deref().unwrap_or("<untitled>"),
            operations = summary.operations.len(),
            "specification parsed"
        );

        Ok(Self {
            file_name: file_name.to_string(),
            raw: content.to_string(),
            root,
            summary,
        })
    }
}

/// Compact, serializable view of the document.
///
/// All fields are best-effort: a document without `info` or `paths` yields
/// `None`s and an empty operation index, never an error.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpecSummary {
    /// `info.title`, if present and a string.
    pub title: Option<String>,
    /// `info.version`, if present and a string.
    pub version: Option<String>,
    /// `openapi` (3.x) or `swagger` (2.0) version marker.
    pub openapi: Option<String>,
    /// Flattened `METHOD /path` index in document order.
    pub operations: Vec<OperationRef>,
}

impl SpecSummary {
    /// Walk the tree defensively and collect whatever is recognizable.
    pub fn derive(root: &Value) -> Self {
        let info = root.get("info");
        let title = info
            .and_then(|i| i.get("title"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let version = info
            .and_then(|i| i.get("version"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let openapi = root
            .get("openapi")
            .or_else(|| root.get("swagger"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let mut operations = Vec::new();
        if let Some(paths) = root.get("paths").and_then(Value::as_mapping) {
            for (path_key, item) in paths {
                let Some(path) = path_key.as_str() else {
                    continue;
                };
                let Some(item) = item.as_mapping() else {
                    continue;
                };
                for method in METHODS {
                    let Some(op) = item.get(method) else {
                        continue;
                    };
                    operations.push(OperationRef {
                        method: method.to_ascii_uppercase(),
                        path: path.to_string(),
                        operation_id: op
                            .get("operationId")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                        summary: op
                            .get("summary")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                    });
                }
            }
        } else {
            debug!("document has no `paths` mapping; operation index is empty");
        }

        Self {
            title,
            version,
            openapi,
            operations,
        }
    }
}

/// One `METHOD /path` entry of the operation index.
#[derive(Debug, Clone, Serialize)]
pub struct OperationRef {
    /// Upper-cased HTTP method (`POST`).
    pub method: String,
    /// Path template exactly as written in the document (`/pet/{petId}`).
    pub path: String,
    /// `operationId`, if present.
    pub operation_id: Option<String>,
    /// `summary`, if present.
    pub summary: Option<String>,
}

impl OperationRef {
    /// Canonical operation reference, e.g. `POST /pet`.
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// Shared slot holding the currently loaded document.
///
/// Cheap to clone; clones observe the same slot. Handlers read through
/// `current()` and hold the returned `Arc` for the duration of one action,
/// so a concurrent re-upload never invalidates text they are working with.
#[derive(Clone, Default)]
pub struct SpecStore {
    slot: Arc<RwLock<Option<Arc<LoadedSpec>>>>,
}

impl SpecStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly parsed document, dropping the previous one.
    #[instrument(skip_all, fields(file = %spec.file_name))]
    pub async fn replace(&self, spec: LoadedSpec) -> Arc<LoadedSpec> {
        let spec = Arc::new(spec);
        *self.slot.write().await = Some(spec.clone());
        spec
    }

    /// Current document, if one has been uploaded this session.
    pub async fn current(&self) -> Option<Arc<LoadedSpec>> {
        self.slot.read().await.clone()
    }

    pub async fn is_loaded(&self) -> bool {
        self.slot.read().await.is_some()
    }

    /// Forget the current document.
    pub async fn clear(&self) {
        *self.slot.write().await = None;
    }
}

/// `.yaml` / `.yml`, case-insensitive.
pub fn has_yaml_extension(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    lower.ends_with(".yaml") || lower.ends_with(".yml")
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
  /pet/{petId}:
    get:
      operationId: getPetById
      summary: Find pet by ID
"#;

    #[test]
    fn parses_and_keeps_top_level_keys() {
        let spec = LoadedSpec::parse("petstore.yaml", PETSTORE).unwrap();

        let keys: Vec<&str> = spec
            .root
            .as_mapping()
            .unwrap()
            .keys()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(keys, vec!["openapi", "info", "paths"]);
    }

    #[test]
    fn summary_indexes_operations_in_document_order() {
        let spec = LoadedSpec::parse("petstore.yml", PETSTORE).unwrap();
        let s = &spec.summary;

        assert_eq!(s.title.as_deref(), Some("Petstore"));
        assert_eq!(s.version.as_deref(), Some("1.0.0"));
        assert_eq!(s.openapi.as_deref(), Some("3.0.0"));

        let labels: Vec<String> = s.operations.iter().map(OperationRef::label).collect();
        assert_eq!(labels, vec!["POST /pet", "GET /pet/{petId}"]);
        assert_eq!(s.operations[0].operation_id.as_deref(), Some("addPet"));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = LoadedSpec::parse("broken.yaml", "paths:\n  /pet\n    post: {").unwrap_err();
        assert!(matches!(err, SpecStoreError::Parse(_)));
    }

    #[test]
    fn wrong_extension_is_rejected_before_parsing() {
        let err = LoadedSpec::parse("spec.json", "{}").unwrap_err();
        assert!(matches!(err, SpecStoreError::UnsupportedExtension(_)));
    }

    #[test]
    fn empty_upload_is_rejected() {
        let err = LoadedSpec::parse("empty.yaml", "   \n").unwrap_err();
        assert!(matches!(err, SpecStoreError::EmptyDocument));
    }

    #[test]
    fn degenerate_documents_summarize_to_nothing() {
        // A bare scalar is valid YAML; every lookup must tolerate it.
        let spec = LoadedSpec::parse("odd.yaml", "just a string").unwrap();
        assert!(spec.summary.title.is_none());
        assert!(spec.summary.operations.is_empty());
    }

    #[tokio::test]
    async fn store_replaces_and_clears() {
        let store = SpecStore::new();
        assert!(!store.is_loaded().await);

        store
            .replace(LoadedSpec::parse("petstore.yaml", PETSTORE).unwrap())
            .await;
        let current = store.current().await.unwrap();
        assert_eq!(current.file_name, "petstore.yaml");

        store.clear().await;
        assert!(store.current().await.is_none());
    }
}
