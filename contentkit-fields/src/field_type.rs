//! Field type variants and their string codecs.
//!
//! Every variant knows how to decode a raw string into a [`FieldValue`], how
//! to encode a value back into its canonical string, and how to check a raw
//! string before it is persisted. Decoding never fails loudly: malformed input
//! yields `None` and [`FieldType::check`] says why.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::types::{EnumDef, FieldShape, FieldValue, ItemType, ValueType};
use crate::validation::{ValidationIssue, ValidationRules};

/// System names of the non-generic built-in field types.
pub mod system_names {
    pub const TEXT: &str = "text";
    pub const URL: &str = "url";
    pub const COLOR: &str = "color";
    pub const TEXT_AREA: &str = "textArea";
    pub const MARKDOWN: &str = "markdown";
    pub const DATETIME: &str = "datetime";
    pub const INTEGER: &str = "integer";
    pub const BOOLEAN: &str = "boolean";
    pub const NUMBER: &str = "number";
    pub const IMAGE: &str = "image";
    pub const FILE: &str = "file";
    pub const ARRAY: &str = "array";

    pub const ALL: [&str; 12] = [
        TEXT, URL, COLOR, TEXT_AREA, MARKDOWN, DATETIME, INTEGER, BOOLEAN, NUMBER, IMAGE, FILE,
        ARRAY,
    ];
}

/// Capability interface for field types registered outside this crate.
///
/// Implementors only describe the format; required/length/range/pattern rules
/// are applied by [`FieldType::check`] for every variant alike.
pub trait FieldCodec: Send + Sync + fmt::Debug {
    /// Human label.
    fn name(&self) -> &str;

    /// Stable identifier. Must be a plain name (no `<`, `>` or `,`).
    fn system_name(&self) -> &str;

    fn value_type(&self) -> ValueType;

    /// Decode a raw string. Malformed input returns `None`.
    fn convert_value(&self, raw: &str) -> Option<FieldValue>;

    /// Canonical encoding. `None` encodes as the empty string.
    fn convert_to_string(&self, value: Option<&FieldValue>) -> String;

    /// Format check for a non-empty raw string.
    fn check_format(&self, raw: &str) -> Result<(), ValidationIssue> {
        match self.convert_value(raw) {
            Some(_) => Ok(()),
            None => Err(ValidationIssue::Malformed {
                expected: self.system_name().to_string(),
                value: raw.to_string(),
            }),
        }
    }

    /// Value a freshly resolved field starts with.
    fn empty_value(&self) -> Option<FieldValue> {
        None
    }
}

/// A field type: one of the built-in variants or a registered custom codec.
#[derive(Debug, Clone)]
pub enum FieldType {
    Text,
    Url,
    /// Hex color, `#RGB` or `#RRGGBB`
    Color,
    TextArea,
    Markdown,
    DateTime,
    Integer,
    Boolean,
    /// Floating point number
    Number,
    /// Path or URL of an uploaded image
    Image,
    /// Path or URL of an uploaded file
    File,
    /// Comma-joined list of strings
    StringArray,
    Array(ItemType),
    Options(Arc<EnumDef>),
    OptionsMulti(Arc<EnumDef>),
    Custom(Arc<dyn FieldCodec>),
}

impl PartialEq for FieldType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldType::Options(a), FieldType::Options(b))
            | (FieldType::OptionsMulti(a), FieldType::OptionsMulti(b)) => a == b,
            (FieldType::Custom(a), FieldType::Custom(b)) => a.system_name() == b.system_name(),
            _ => {
                std::mem::discriminant(self) == std::mem::discriminant(other)
                    && self.shape() == other.shape()
            }
        }
    }
}

impl FieldType {
    /// Built-in non-generic variant for a system name.
    pub fn builtin(system_name: &str) -> Option<Self> {
        use system_names::*;
        let ft = match system_name {
            TEXT => FieldType::Text,
            URL => FieldType::Url,
            COLOR => FieldType::Color,
            TEXT_AREA => FieldType::TextArea,
            MARKDOWN => FieldType::Markdown,
            DATETIME => FieldType::DateTime,
            INTEGER => FieldType::Integer,
            BOOLEAN => FieldType::Boolean,
            NUMBER => FieldType::Number,
            IMAGE => FieldType::Image,
            FILE => FieldType::File,
            ARRAY => FieldType::StringArray,
            _ => return None,
        };
        Some(ft)
    }

    /// The scalar field type used to decode one item of `array<T>`.
    pub fn for_item(item: ItemType) -> Self {
        match item {
            ItemType::String => FieldType::Text,
            ItemType::Int => FieldType::Integer,
            ItemType::Float => FieldType::Number,
            ItemType::Bool => FieldType::Boolean,
            ItemType::DateTime => FieldType::DateTime,
        }
    }

    /// Human label.
    pub fn name(&self) -> Cow<'_, str> {
        let label = match self {
            FieldType::Text => "Text",
            FieldType::Url => "URL",
            FieldType::Color => "Color",
            FieldType::TextArea => "Text Area",
            FieldType::Markdown => "Markdown",
            FieldType::DateTime => "Date Time",
            FieldType::Integer => "Integer",
            FieldType::Boolean => "Boolean",
            FieldType::Number => "Number",
            FieldType::Image => "Image",
            FieldType::File => "File",
            FieldType::StringArray => "Array",
            FieldType::Array(item) => return Cow::Owned(format!("Array of {}", item.label())),
            FieldType::Options(def) => return Cow::Owned(format!("Options ({})", def.name)),
            FieldType::OptionsMulti(def) => {
                return Cow::Owned(format!("Multiple Options ({})", def.name))
            }
            FieldType::Custom(codec) => codec.name(),
        };
        Cow::Borrowed(label)
    }

    /// Declared shape this field type resolves from.
    pub fn shape(&self) -> FieldShape {
        match self {
            FieldType::Array(item) => FieldShape::Array(*item),
            FieldType::Options(def) => FieldShape::Options(def.name.clone()),
            FieldType::OptionsMulti(def) => FieldShape::OptionsMulti(def.name.clone()),
            _ => FieldShape::Plain(self.system_name().into_owned()),
        }
    }

    /// Stable identifier, unique per variant and parameter.
    pub fn system_name(&self) -> Cow<'_, str> {
        use system_names::*;
        let name = match self {
            FieldType::Text => TEXT,
            FieldType::Url => URL,
            FieldType::Color => COLOR,
            FieldType::TextArea => TEXT_AREA,
            FieldType::Markdown => MARKDOWN,
            FieldType::DateTime => DATETIME,
            FieldType::Integer => INTEGER,
            FieldType::Boolean => BOOLEAN,
            FieldType::Number => NUMBER,
            FieldType::Image => IMAGE,
            FieldType::File => FILE,
            FieldType::StringArray => ARRAY,
            FieldType::Custom(codec) => codec.system_name(),
            FieldType::Array(_) | FieldType::Options(_) | FieldType::OptionsMulti(_) => {
                return Cow::Owned(self.shape().to_string())
            }
        };
        Cow::Borrowed(name)
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            FieldType::Text
            | FieldType::Url
            | FieldType::Color
            | FieldType::TextArea
            | FieldType::Markdown
            | FieldType::Image
            | FieldType::File => ValueType::String,
            FieldType::DateTime => ValueType::Timestamp,
            FieldType::Integer => ValueType::Integer,
            FieldType::Boolean => ValueType::Boolean,
            FieldType::Number => ValueType::Float,
            FieldType::StringArray => ValueType::StringArray,
            FieldType::Array(item) => ValueType::TypedArray(*item),
            FieldType::Options(_) => ValueType::Enum,
            FieldType::OptionsMulti(_) => ValueType::EnumSet,
            FieldType::Custom(codec) => codec.value_type(),
        }
    }

    /// Whether the value is a collection (absent and empty are equivalent).
    pub fn is_collection(&self) -> bool {
        matches!(
            self.value_type(),
            ValueType::StringArray | ValueType::TypedArray(_) | ValueType::EnumSet
        )
    }

    /// The enumeration behind an `options<T>` or `options-multi<T>` field.
    pub fn enum_def(&self) -> Option<&Arc<EnumDef>> {
        match self {
            FieldType::Options(def) | FieldType::OptionsMulti(def) => Some(def),
            _ => None,
        }
    }

    /// Value a freshly resolved field starts with: empty for collections.
    pub fn empty_value(&self) -> Option<FieldValue> {
        match self {
            FieldType::StringArray | FieldType::Array(_) => Some(FieldValue::List(Vec::new())),
            FieldType::OptionsMulti(_) => Some(FieldValue::Choices(Vec::new())),
            FieldType::Custom(codec) => codec.empty_value(),
            _ => None,
        }
    }

    /// Decode a raw string. Malformed input yields `None`.
    ///
    /// The empty string decodes to `None` for scalar variants and to an empty
    /// collection for list variants.
    pub fn convert_value(&self, raw: &str) -> Option<FieldValue> {
        match self {
            FieldType::Text
            | FieldType::TextArea
            | FieldType::Markdown
            | FieldType::Image
            | FieldType::File => non_empty(raw).map(FieldValue::from),
            FieldType::Url => non_empty(raw)
                .filter(|s| is_absolute_url(s))
                .map(FieldValue::from),
            FieldType::Color => non_empty(raw).filter(|s| is_hex_color(s)).map(FieldValue::from),
            FieldType::DateTime => parse_datetime(raw).map(FieldValue::DateTime),
            FieldType::Integer => raw.trim().parse::<i64>().ok().map(FieldValue::Int),
            FieldType::Boolean => parse_bool(raw).map(FieldValue::Bool),
            FieldType::Number => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(FieldValue::Float),
            FieldType::StringArray => Some(FieldValue::List(
                list_items(raw).map(FieldValue::from).collect(),
            )),
            FieldType::Array(item) => {
                let item_type = FieldType::for_item(*item);
                list_items(raw)
                    .map(|part| item_type.convert_value(part))
                    .collect::<Option<Vec<_>>>()
                    .map(FieldValue::List)
            }
            FieldType::Options(def) => def
                .resolve(raw.trim())
                .map(|m| FieldValue::Choice(m.name.clone())),
            FieldType::OptionsMulti(def) => list_items(raw)
                .map(|part| def.resolve(part.trim()).map(|m| m.name.clone()))
                .collect::<Option<Vec<_>>>()
                .map(FieldValue::Choices),
            FieldType::Custom(codec) => codec.convert_value(raw),
        }
    }

    /// Canonical string encoding. `None` encodes as the empty string.
    pub fn convert_to_string(&self, value: Option<&FieldValue>) -> String {
        match (self, value) {
            (FieldType::Custom(codec), value) => codec.convert_to_string(value),
            (_, None) => String::new(),
            (_, Some(value)) => encode(value),
        }
    }

    /// Check a raw string against the format of this field type and, when
    /// given, the declared rules.
    pub fn check(&self, raw: &str, rules: Option<&ValidationRules>) -> Result<(), ValidationIssue> {
        if raw.trim().is_empty() {
            return match rules {
                Some(rules) if rules.required => Err(ValidationIssue::Required {
                    message: rules.required_message.clone(),
                }),
                _ => Ok(()),
            };
        }

        self.check_format(raw)?;

        match rules {
            Some(rules) => rules.check(raw, self.convert_value(raw).as_ref()),
            None => Ok(()),
        }
    }

    /// Whether a raw string is acceptable for this field.
    pub fn validate(&self, raw: &str, rules: Option<&ValidationRules>) -> bool {
        self.check(raw, rules).is_ok()
    }

    /// Built-in variants accept only their canonical encoding: the raw string
    /// must decode and re-encode to itself. Decoding alone stays lenient.
    fn check_format(&self, raw: &str) -> Result<(), ValidationIssue> {
        let ok = match self {
            FieldType::Custom(codec) => return codec.check_format(raw),
            _ => {
                let value = self.convert_value(raw);
                value.is_some() && self.convert_to_string(value.as_ref()) == raw
            }
        };
        if ok {
            Ok(())
        } else {
            Err(ValidationIssue::Malformed {
                expected: self.system_name().into_owned(),
                value: raw.to_string(),
            })
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.system_name())
    }
}

fn non_empty(raw: &str) -> Option<&str> {
    (!raw.is_empty()).then_some(raw)
}

/// Comma-separated entries with empty entries dropped.
fn list_items(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').filter(|part| !part.trim().is_empty())
}

fn encode(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) | FieldValue::Choice(s) => s.clone(),
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Int(i) => i.to_string(),
        FieldValue::Float(f) => f.to_string(),
        FieldValue::DateTime(dt) => format_datetime(dt),
        FieldValue::List(items) => items
            .iter()
            .map(encode)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(","),
        FieldValue::Choices(names) => names.join(","),
    }
}

/// RFC 3339 in UTC, with fractional seconds only when present.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD`.
/// Values without an offset are taken as UTC.
pub(crate) fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn is_hex_color(raw: &str) -> bool {
    match raw.strip_prefix('#') {
        Some(hex) => {
            (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

fn is_absolute_url(raw: &str) -> bool {
    url::Url::parse(raw).map(|u| u.has_host()).unwrap_or(false)
}
