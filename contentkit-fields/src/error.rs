//! Error types for the field type registry

use thiserror::Error;

/// Result type for field registry operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur while building or querying the field type registry
#[derive(Debug, Error)]
pub enum FieldsError {
    /// A field type with this system name is already registered
    #[error("duplicate field type: {system_name}")]
    DuplicateFieldType { system_name: String },

    /// An enumeration with this name is already registered
    #[error("duplicate enumeration: {name}")]
    DuplicateEnum { name: String },

    /// Enumeration definition is unusable
    #[error("invalid enumeration '{name}': {reason}")]
    InvalidEnum { name: String, reason: String },

    /// A system name or declared shape could not be parsed
    #[error("invalid field shape: {shape}")]
    InvalidShape { shape: String },
}
