//! Conversion of declared default values into the JSON shape of a schema node.

use contentkit_fields::{EnumDef, FieldType, FieldValue, ValueType};
use serde_json::{Number, Value};

/// Convert a declared default into the node's native JSON shape.
///
/// Returns `None` when the declared value does not fit the field type.
pub fn convert_default(field_type: &FieldType, declared: &Value) -> Option<Value> {
    match field_type {
        FieldType::Text
        | FieldType::TextArea
        | FieldType::Markdown
        | FieldType::Url
        | FieldType::Color
        | FieldType::Image
        | FieldType::File
        | FieldType::DateTime => canonical_string(field_type, declared.as_str()?),
        FieldType::Boolean => match declared {
            Value::Bool(b) => Some(Value::Bool(*b)),
            Value::String(s) => match field_type.convert_value(s)? {
                FieldValue::Bool(b) => Some(Value::Bool(b)),
                _ => None,
            },
            _ => None,
        },
        FieldType::Integer => integer(declared).map(Value::from),
        FieldType::Number => float(declared).and_then(Number::from_f64).map(Value::Number),
        FieldType::StringArray => each_item(&FieldType::Text, declared),
        FieldType::Array(item) => each_item(&FieldType::for_item(*item), declared),
        FieldType::Options(def) => ordinal(def, declared).map(Value::String),
        FieldType::OptionsMulti(def) => declared
            .as_array()?
            .iter()
            .map(|v| ordinal(def, v).map(Value::String))
            .collect::<Option<Vec<_>>>()
            .map(Value::Array),
        FieldType::Custom(codec) => match codec.value_type() {
            ValueType::Boolean => convert_default(&FieldType::Boolean, declared),
            ValueType::Integer => convert_default(&FieldType::Integer, declared),
            ValueType::Float => convert_default(&FieldType::Number, declared),
            _ => canonical_string(field_type, declared.as_str()?),
        },
    }
}

fn canonical_string(field_type: &FieldType, raw: &str) -> Option<Value> {
    let value = field_type.convert_value(raw)?;
    Some(Value::String(field_type.convert_to_string(Some(&value))))
}

fn integer(declared: &Value) -> Option<i64> {
    match declared {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn float(declared: &Value) -> Option<f64> {
    match declared {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn each_item(item_type: &FieldType, declared: &Value) -> Option<Value> {
    declared
        .as_array()?
        .iter()
        .map(|item| convert_default(item_type, item))
        .collect::<Option<Vec<_>>>()
        .map(Value::Array)
}

/// Member ordinal for a declared name or ordinal.
fn ordinal(def: &EnumDef, declared: &Value) -> Option<String> {
    let member = match declared {
        Value::String(s) => def.resolve(s.trim()),
        Value::Number(n) => def.member_by_value(n.as_i64()?),
        _ => None,
    }?;
    Some(member.value.to_string())
}
