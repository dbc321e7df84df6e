//! Core value and shape types for field types.
//!
//! Enumeration definitions serialize to/from YAML via serde so they can be
//! authored next to content type descriptors. Field shapes parse from and
//! format to system names such as `array<int>` or `options<priority>`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FieldsError, Result};

/// Item type of a parameterized `array<T>` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    String,
    Int,
    Float,
    Bool,
    DateTime,
}

impl ItemType {
    pub const ALL: [ItemType; 5] = [
        ItemType::String,
        ItemType::Int,
        ItemType::Float,
        ItemType::Bool,
        ItemType::DateTime,
    ];

    /// The tag used inside a system name, e.g. `int` in `array<int>`.
    pub fn tag(self) -> &'static str {
        match self {
            ItemType::String => "string",
            ItemType::Int => "int",
            ItemType::Float => "float",
            ItemType::Bool => "bool",
            ItemType::DateTime => "datetime",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    /// Human label used in field type names.
    pub fn label(self) -> &'static str {
        match self {
            ItemType::String => "String",
            ItemType::Int => "Integer",
            ItemType::Float => "Number",
            ItemType::Bool => "Boolean",
            ItemType::DateTime => "Date Time",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One member of an enumeration.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EnumMember {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Label shown to editors: the description when declared, else the name.
    pub fn label(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.name)
    }
}

/// A named enumeration that parameterizes `options<T>` and `options-multi<T>`.
///
/// Members keep declaration order. When authored in YAML a member may be a
/// bare name, and a member without an explicit `value` takes the previous
/// member's value plus one (the first defaults to zero).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "EnumDefRepr")]
pub struct EnumDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub members: Vec<EnumMember>,
}

impl EnumDef {
    pub fn new(name: impl Into<String>, members: Vec<EnumMember>) -> Self {
        Self {
            name: name.into(),
            description: None,
            members,
        }
    }

    /// Build an enumeration whose values are the declaration ordinals.
    pub fn from_names(name: impl Into<String>, names: &[&str]) -> Self {
        let members = names
            .iter()
            .zip(0..)
            .map(|(n, v)| EnumMember::new(*n, v))
            .collect();
        Self::new(name, members)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn member_by_name(&self, name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn member_by_value(&self, value: i64) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.value == value)
    }

    /// Resolve a raw token by member name, falling back to the numeric value.
    pub fn resolve(&self, raw: &str) -> Option<&EnumMember> {
        self.member_by_name(raw)
            .or_else(|| raw.parse::<i64>().ok().and_then(|v| self.member_by_value(v)))
    }

    /// Check that the enumeration is usable as a field type parameter.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| FieldsError::InvalidEnum {
            name: self.name.clone(),
            reason,
        };
        if self.name.is_empty() || self.name.contains(['<', '>', ',']) {
            return Err(invalid("name must be non-empty without '<', '>' or ','".into()));
        }
        for (i, member) in self.members.iter().enumerate() {
            if member.name.is_empty() || member.name.contains(',') {
                return Err(invalid(format!("member #{i} has an unusable name")));
            }
            let rest = &self.members[i + 1..];
            if rest.iter().any(|m| m.name == member.name) {
                return Err(invalid(format!("duplicate member name '{}'", member.name)));
            }
            if rest.iter().any(|m| m.value == member.value) {
                return Err(invalid(format!("duplicate member value {}", member.value)));
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct EnumDefRepr {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    members: Vec<EnumMemberRepr>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EnumMemberRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        value: Option<i64>,
        #[serde(default)]
        description: Option<String>,
    },
}

impl From<EnumDefRepr> for EnumDef {
    fn from(repr: EnumDefRepr) -> Self {
        let mut next = 0i64;
        let members = repr
            .members
            .into_iter()
            .map(|m| {
                let (name, value, description) = match m {
                    EnumMemberRepr::Name(name) => (name, None, None),
                    EnumMemberRepr::Full {
                        name,
                        value,
                        description,
                    } => (name, value, description),
                };
                let value = value.unwrap_or(next);
                next = value.saturating_add(1);
                EnumMember {
                    name,
                    value,
                    description,
                }
            })
            .collect();
        Self {
            name: repr.name,
            description: repr.description,
            members,
        }
    }
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    DateTime(DateTime<Utc>),
    List(Vec<FieldValue>),
    /// Name of the selected enumeration member.
    Choice(String),
    /// Names of the selected enumeration members, in selection order.
    Choices(Vec<String>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::Choice(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view used by range rules and comparisons.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Semantic shape of a decoded value, as reported by a field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Boolean,
    Integer,
    Float,
    Timestamp,
    StringArray,
    TypedArray(ItemType),
    Enum,
    EnumSet,
}

/// The declared shape of a content field, before it is resolved to a field type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldShape {
    /// A non-generic field type, e.g. `text` or a custom registered name
    Plain(String),
    Array(ItemType),
    /// Single choice over the named enumeration
    Options(String),
    /// Multiple choice over the named enumeration
    OptionsMulti(String),
}

impl FieldShape {
    pub fn plain(name: impl Into<String>) -> Self {
        FieldShape::Plain(name.into())
    }
}

fn generic_param<'a>(raw: &'a str, prefix: &str) -> Option<&'a str> {
    raw.strip_prefix(prefix)?
        .strip_prefix('<')?
        .strip_suffix('>')
        .map(str::trim)
}

impl FromStr for FieldShape {
    type Err = FieldsError;

    fn from_str(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let invalid = || FieldsError::InvalidShape {
            shape: raw.to_string(),
        };
        let valid_param = |p: &str| !p.is_empty() && !p.contains(['<', '>', ',']);

        if let Some(param) = generic_param(raw, "array") {
            return ItemType::from_tag(param)
                .map(FieldShape::Array)
                .ok_or_else(invalid);
        }
        if let Some(param) = generic_param(raw, "options-multi") {
            return valid_param(param)
                .then(|| FieldShape::OptionsMulti(param.to_string()))
                .ok_or_else(invalid);
        }
        if let Some(param) = generic_param(raw, "options") {
            return valid_param(param)
                .then(|| FieldShape::Options(param.to_string()))
                .ok_or_else(invalid);
        }
        if raw.is_empty() || raw.contains(['<', '>', ',']) {
            return Err(invalid());
        }
        Ok(FieldShape::Plain(raw.to_string()))
    }
}

impl fmt::Display for FieldShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldShape::Plain(name) => f.write_str(name),
            FieldShape::Array(item) => write!(f, "array<{item}>"),
            FieldShape::Options(name) => write!(f, "options<{name}>"),
            FieldShape::OptionsMulti(name) => write!(f, "options-multi<{name}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_type_tags_round_trip() {
        for item in ItemType::ALL {
            assert_eq!(ItemType::from_tag(item.tag()), Some(item));
        }
        assert_eq!(ItemType::from_tag("decimal"), None);
    }

    #[test]
    fn shape_parses_generic_names() {
        assert_eq!(
            "array<int>".parse::<FieldShape>().unwrap(),
            FieldShape::Array(ItemType::Int)
        );
        assert_eq!(
            "options<priority>".parse::<FieldShape>().unwrap(),
            FieldShape::Options("priority".into())
        );
        assert_eq!(
            "options-multi<color>".parse::<FieldShape>().unwrap(),
            FieldShape::OptionsMulti("color".into())
        );
        assert_eq!(
            "markdown".parse::<FieldShape>().unwrap(),
            FieldShape::plain("markdown")
        );
    }

    #[test]
    fn shape_rejects_malformed_names() {
        for raw in ["", "array<decimal>", "options<>", "options<a,b>", "text<x>", "array<"] {
            assert!(raw.parse::<FieldShape>().is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn shape_display_matches_parse() {
        for shape in [
            FieldShape::plain("textArea"),
            FieldShape::Array(ItemType::DateTime),
            FieldShape::Options("size".into()),
            FieldShape::OptionsMulti("size".into()),
        ] {
            assert_eq!(shape.to_string().parse::<FieldShape>().unwrap(), shape);
        }
    }

    #[test]
    fn enum_resolves_by_name_then_value() {
        let def = EnumDef::from_names("priority", &["Low", "Medium", "High"]);
        assert_eq!(def.resolve("High").unwrap().value, 2);
        assert_eq!(def.resolve("1").unwrap().name, "Medium");
        assert!(def.resolve("Urgent").is_none());
        assert!(def.resolve("7").is_none());
    }

    #[test]
    fn enum_validate_rejects_duplicates() {
        let def = EnumDef::new(
            "size",
            vec![EnumMember::new("Small", 0), EnumMember::new("Small", 1)],
        );
        assert!(def.validate().is_err());

        let def = EnumDef::new(
            "size",
            vec![EnumMember::new("Small", 0), EnumMember::new("Large", 0)],
        );
        assert!(def.validate().is_err());

        assert!(EnumDef::from_names("size", &["Small", "Large"]).validate().is_ok());
    }

    #[test]
    fn enum_yaml_fills_implicit_values() {
        let yaml = r#"
name: status
description: Workflow state
members:
  - Draft
  - name: Review
    description: Waiting for review
  - name: Archived
    value: 10
  - Deleted
"#;
        let def: EnumDef = serde_yaml::from_str(yaml).unwrap();
        let values: Vec<_> = def.members.iter().map(|m| (m.name.as_str(), m.value)).collect();
        assert_eq!(
            values,
            vec![("Draft", 0), ("Review", 1), ("Archived", 10), ("Deleted", 11)]
        );
        assert_eq!(def.members[1].label(), "Waiting for review");
        assert_eq!(def.members[0].label(), "Draft");
    }

    #[test]
    fn enum_yaml_round_trip() {
        let def = EnumDef::new(
            "color",
            vec![
                EnumMember::new("Red", 1).with_description("Warm red"),
                EnumMember::new("Blue", 4),
            ],
        );
        let yaml = serde_yaml::to_string(&def).unwrap();
        let parsed: EnumDef = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(def, parsed);
    }

    #[test]
    fn list_value_from_vec() {
        let value = FieldValue::from(vec!["a", "b"]);
        assert_eq!(
            value,
            FieldValue::List(vec![FieldValue::Text("a".into()), FieldValue::Text("b".into())])
        );
    }
}
