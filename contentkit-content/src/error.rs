//! Error types for content handling

use std::fmt;
use std::path::PathBuf;

use contentkit_fields::FieldsError;
use thiserror::Error;

/// Result type for content operations
pub type Result<T> = std::result::Result<T, ContentError>;

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors that can occur in content operations
#[derive(Debug, Error)]
pub enum ContentError {
    /// A descriptor does not satisfy the content type contract
    #[error("invalid content type '{id}': {reason}")]
    InvalidContentType { id: String, reason: String },

    /// No content type with this id is known
    #[error("unknown content type: {id}")]
    UnknownContentType { id: String },

    /// A stored row belongs to a different content type than requested
    #[error("content type mismatch: expected {expected}, found {found}")]
    ContentTypeMismatch { expected: String, found: String },

    /// No content row with this id or slug
    #[error("content not found: {id}")]
    NotFound { id: String },

    /// Slug already used by another row
    #[error("duplicate slug: {slug}")]
    DuplicateSlug { slug: String },

    /// One or more field values failed validation
    #[error("content failed validation: {}", join_issues(.issues))]
    ValidationFailed { issues: Vec<FieldIssue> },

    /// The storage collaborator failed
    #[error("storage error: {0}")]
    Storage(String),

    /// Content type directory not found
    #[error("content type directory not found: {path}")]
    NotInitialized { path: PathBuf },

    #[error(transparent)]
    Fields(#[from] FieldsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ContentError {
    /// Whether this should surface as "not found" to an API caller.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ContentError::UnknownContentType { .. } | ContentError::NotFound { .. }
        )
    }

    /// Whether this should surface as "validation failed" to an API caller.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ContentError::ValidationFailed { .. } | ContentError::DuplicateSlug { .. }
        )
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ContentError::UnknownContentType { id: "blog.post".into() };
        assert_eq!(err.to_string(), "unknown content type: blog.post");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_validation_error_lists_fields() {
        let err = ContentError::ValidationFailed {
            issues: vec![
                FieldIssue {
                    field: "Title".into(),
                    message: "a value is required".into(),
                },
                FieldIssue {
                    field: "Color".into(),
                    message: "'red' is not a valid color value".into(),
                },
            ],
        };
        let text = err.to_string();
        assert!(text.contains("Title: a value is required"));
        assert!(text.contains("; Color:"));
        assert!(err.is_validation());
    }
}
