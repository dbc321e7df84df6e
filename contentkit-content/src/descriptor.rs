//! Content type descriptors.
//!
//! A content type is declared once, either in code with the builder methods
//! below or as a YAML file, and lists its fields in declaration order. Each
//! field names its field type by system name and carries its display and
//! validation metadata directly.

use std::cmp::Ordering;
use std::collections::HashSet;

use contentkit_fields::ValidationRules;
use serde::{Deserialize, Serialize};

use crate::error::{ContentError, Result};

/// Comparison operator for cross-field rules.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    #[default]
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
        }
    }

    /// Whether `ordering` (this field compared to the other) satisfies the operator.
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
        }
    }
}

/// A rule comparing this field's value to another field of the same content type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Compare {
    pub field: String,
    #[serde(default)]
    pub op: CompareOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One field of a content type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    /// System name of the field type, e.g. `markdown` or `options<priority>`.
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    /// Display format hint, e.g. `YYYY-MM-DD HH:mm` for datetimes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Widget override for form rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare: Option<Compare>,
    #[serde(flatten)]
    pub rules: ValidationRules,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            display_name: None,
            description: None,
            order: None,
            format: None,
            widget: None,
            default: None,
            compare: None,
            rules: ValidationRules::default(),
        }
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn widget(mut self, widget: impl Into<String>) -> Self {
        self.widget = Some(widget.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.rules.required = true;
        self
    }

    pub fn required_message(mut self, message: impl Into<String>) -> Self {
        self.rules.required = true;
        self.rules.required_message = Some(message.into());
        self
    }

    pub fn length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.rules.min_length = min;
        self.rules.max_length = max;
        self
    }

    pub fn range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.rules.min = min;
        self.rules.max = max;
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>, message: Option<&str>) -> Self {
        self.rules.pattern = Some(pattern.into());
        self.rules.pattern_message = message.map(str::to_string);
        self
    }

    pub fn compare(mut self, field: impl Into<String>, op: CompareOp) -> Self {
        self.compare = Some(Compare {
            field: field.into(),
            op,
            message: None,
        });
        self
    }

    /// Title shown to editors when no enumeration description applies.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// A content type: a named, ordered set of typed fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentTypeDef {
    /// Fully-qualified identifier, stored on every content row.
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Rank used when content types are listed.
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

impl ContentTypeDef {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: None,
            order: 0,
            fields: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Add a field declaration.
    pub fn field(mut self, decl: FieldDecl) -> Self {
        self.fields.push(decl);
        self
    }

    pub fn field_decl(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check the content type contract: a non-empty id, non-empty and unique
    /// field names, and comparisons that point at declared fields.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| ContentError::InvalidContentType {
            id: self.id.clone(),
            reason,
        };
        if self.id.trim().is_empty() {
            return Err(invalid("id must not be empty".into()));
        }
        let mut seen = HashSet::new();
        for decl in &self.fields {
            if decl.name.trim().is_empty() {
                return Err(invalid("field names must not be empty".into()));
            }
            if !seen.insert(decl.name.as_str()) {
                return Err(invalid(format!("duplicate field name '{}'", decl.name)));
            }
        }
        for decl in &self.fields {
            if let Some(compare) = &decl.compare {
                if !seen.contains(compare.field.as_str()) || compare.field == decl.name {
                    return Err(invalid(format!(
                        "field '{}' compares against unknown field '{}'",
                        decl.name, compare.field
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn summary(&self) -> ContentTypeSummary {
        ContentTypeSummary {
            system_type_id: self.id.clone(),
            display_name: self.display_name.clone(),
            description: self.description.clone(),
            order_rank: self.order,
        }
    }
}

/// Listing entry for a content type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeSummary {
    pub system_type_id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub order_rank: i32,
}
