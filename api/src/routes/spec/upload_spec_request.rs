use serde::Deserialize;

/// Request body for uploading an OpenAPI document.
///
/// The document travels as plain text; the server accepts or rejects it
/// based on the file extension and the YAML parse.
#[derive(Debug, Deserialize)]
pub struct UploadSpecRequest {
    /// Original file name, used for the extension check (`.yaml`/`.yml`).
    pub file_name: String,
    /// Full document text, exactly as the user supplied it.
    pub content: String,
}
