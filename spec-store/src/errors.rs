use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpecStoreError>;

/// Errors raised while accepting an uploaded specification.
///
/// Every variant maps to a user-visible message; an error here means the
/// upload was rejected and the previously stored document (if any) is kept.
#[derive(Debug, Error)]
pub enum SpecStoreError {
    /// Upload had an extension other than `.yaml`/`.yml`.
    #[error("unsupported file extension in `{0}`: expected .yaml or .yml")]
    UnsupportedExtension(String),

    /// Upload was empty or whitespace-only.
    #[error("uploaded document is empty")]
    EmptyDocument,

    /// The document is not well-formed YAML.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}
