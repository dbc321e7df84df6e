//! Schema wire types consumed by the form renderer.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::widget::Widget;

/// JSON value kind of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

/// Kind of a client-side validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorKind {
    Url,
    Pattern,
    Compare,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorRule {
    pub kind: ValidatorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Expression over `$self` and `$values`, for comparisons
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidatorRule {
    pub fn url() -> Self {
        Self {
            kind: ValidatorKind::Url,
            pattern: None,
            expression: None,
            message: None,
        }
    }

    pub fn pattern(pattern: impl Into<String>, message: Option<String>) -> Self {
        Self {
            kind: ValidatorKind::Pattern,
            pattern: Some(pattern.into()),
            expression: None,
            message,
        }
    }

    pub fn compare(expression: impl Into<String>, message: Option<String>) -> Self {
        Self {
            kind: ValidatorKind::Compare,
            pattern: None,
            expression: Some(expression.into()),
            message,
        }
    }
}

/// One selectable option of an enumeration widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub label: String,
    /// Member ordinal, as a string
    pub value: String,
}

/// Schema of a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    #[serde(rename = "type")]
    pub kind: SchemaType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub widget: Widget,
    pub component: String,
    /// Component specific options, e.g. `options` or `showTime`
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub props: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<ValidatorRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
}

impl SchemaNode {
    pub fn new(kind: SchemaType, title: impl Into<String>, widget: Widget) -> Self {
        Self {
            kind,
            title: title.into(),
            description: None,
            widget,
            component: widget.component().to_string(),
            props: Map::new(),
            default: None,
            min_length: None,
            max_length: None,
            min: None,
            max: None,
            pattern: None,
            validators: Vec::new(),
            required_message: None,
            items: None,
        }
    }

    /// Replace the widget, keeping the component in step.
    pub fn set_widget(&mut self, widget: Widget) {
        self.widget = widget;
        self.component = widget.component().to_string();
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    /// Options of an enumeration widget, in declaration order.
    pub fn options(&self) -> Vec<OptionItem> {
        self.prop("options")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }
}

/// Root schema of a content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSchema {
    #[serde(rename = "type")]
    pub kind: SchemaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub properties: IndexMap<String, SchemaNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl ContentSchema {
    pub fn new() -> Self {
        Self {
            kind: SchemaType::Object,
            title: None,
            description: None,
            properties: IndexMap::new(),
            required: Vec::new(),
        }
    }

    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties.get(name)
    }
}

impl Default for ContentSchema {
    fn default() -> Self {
        Self::new()
    }
}
