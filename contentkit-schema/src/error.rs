//! Error types for schema generation

use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors that can occur while generating a schema
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The descriptor does not satisfy the content type contract
    #[error("'{id}' is not a content type: {reason}")]
    NotAContentType { id: String, reason: String },

    /// No content type with this id is known to the catalog
    #[error("unknown content type: {id}")]
    UnknownContentType { id: String },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
