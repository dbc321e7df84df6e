//! A live field: a field type together with its decoded value slot.

use chrono::{DateTime, Utc};

use crate::field_type::FieldType;
use crate::types::FieldValue;
use crate::validation::ValidationRules;

/// A field type instance holding one decoded value.
///
/// The slot is always reachable as a string through [`Field::value_string`]
/// and [`Field::set_value_string`], which is how the serializer treats every
/// field uniformly regardless of variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    field_type: FieldType,
    value: Option<FieldValue>,
    /// Last raw string that failed to decode, kept for validation messages
    rejected: Option<String>,
}

impl Field {
    /// A field holding the type's empty value (an empty list for collections).
    pub fn new(field_type: FieldType) -> Self {
        let value = field_type.empty_value();
        Self {
            field_type,
            value,
            rejected: None,
        }
    }

    pub fn with_value(field_type: FieldType, value: impl Into<FieldValue>) -> Self {
        Self {
            field_type,
            value: Some(value.into()),
            rejected: None,
        }
    }

    /// Decode `raw` into a new field. Malformed input leaves the empty value.
    pub fn from_string(field_type: FieldType, raw: &str) -> Self {
        let mut field = Self::new(field_type);
        field.set_value_string(raw);
        field
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn value(&self) -> Option<&FieldValue> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: Option<FieldValue>) {
        self.value = value;
        self.rejected = None;
    }

    /// Canonical string form of the current value.
    pub fn value_string(&self) -> String {
        self.field_type.convert_to_string(self.value.as_ref())
    }

    /// Replace the value by decoding `raw`.
    ///
    /// Returns `false` when `raw` was non-empty but did not decode, in which
    /// case the slot is reset to the empty value and `raw` is kept as the
    /// [rejected value](Field::rejected_value).
    pub fn set_value_string(&mut self, raw: &str) -> bool {
        match self.field_type.convert_value(raw) {
            Some(value) => {
                self.value = Some(value);
                self.rejected = None;
                true
            }
            None => {
                self.value = self.field_type.empty_value();
                if raw.trim().is_empty() {
                    self.rejected = None;
                    true
                } else {
                    self.rejected = Some(raw.to_string());
                    false
                }
            }
        }
    }

    /// Raw string from the last [`set_value_string`](Field::set_value_string)
    /// that did not decode.
    pub fn rejected_value(&self) -> Option<&str> {
        self.rejected.as_deref()
    }

    /// String that validation looks at: the rejected raw string when there is
    /// one, else the canonical form of the value.
    pub fn raw_for_validation(&self) -> String {
        match &self.rejected {
            Some(raw) => raw.clone(),
            None => self.value_string(),
        }
    }

    /// True when the slot holds nothing or an empty collection.
    pub fn is_empty(&self) -> bool {
        match &self.value {
            None => true,
            Some(FieldValue::List(items)) => items.is_empty(),
            Some(FieldValue::Choices(names)) => names.is_empty(),
            Some(FieldValue::Text(s)) => s.is_empty(),
            Some(_) => false,
        }
    }

    /// Whether the current value passes the field type's check and `rules`.
    pub fn validate(&self, rules: Option<&ValidationRules>) -> bool {
        self.validation_error_message(rules).is_none()
    }

    /// Message describing why the current value is rejected, if it is.
    pub fn validation_error_message(&self, rules: Option<&ValidationRules>) -> Option<String> {
        self.field_type
            .check(&self.raw_for_validation(), rules)
            .err()
            .map(|issue| issue.to_string())
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            Some(FieldValue::Bool(b)) => Some(b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.value {
            Some(FieldValue::Int(i)) => Some(i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.value {
            Some(FieldValue::Float(f)) => Some(f),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self.value {
            Some(FieldValue::DateTime(dt)) => Some(dt),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match &self.value {
            Some(FieldValue::List(items)) => Some(items),
            _ => None,
        }
    }

    /// Items of a string list, skipping non-text items.
    pub fn as_strings(&self) -> Vec<&str> {
        self.as_list()
            .map(|items| items.iter().filter_map(FieldValue::as_str).collect())
            .unwrap_or_default()
    }

    pub fn as_choice(&self) -> Option<&str> {
        match &self.value {
            Some(FieldValue::Choice(name)) => Some(name),
            _ => None,
        }
    }

    pub fn as_choices(&self) -> Option<&[String]> {
        match &self.value {
            Some(FieldValue::Choices(names)) => Some(names),
            _ => None,
        }
    }
}
