//! The flat storage unit produced by the serializer.

use serde::{Deserialize, Serialize};

/// One `(fieldName, value)` pair of a serialized content instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFieldValue {
    pub field_name: String,
    pub value: String,
}

impl ContentFieldValue {
    pub fn new(field_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            value: value.into(),
        }
    }
}
