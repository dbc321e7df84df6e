//! Widgets and the form components that render them.

use std::fmt;
use std::str::FromStr;

use contentkit_fields::{FieldType, ValueType};
use serde::{Deserialize, Serialize};

/// How a field is edited in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Widget {
    Input,
    Textarea,
    Markdown,
    Url,
    Color,
    Datetime,
    Number,
    Switch,
    Upload,
    List,
    Select,
    Radio,
    MultiSelect,
    CheckboxGroup,
}

impl Widget {
    pub const ALL: [Widget; 14] = [
        Widget::Input,
        Widget::Textarea,
        Widget::Markdown,
        Widget::Url,
        Widget::Color,
        Widget::Datetime,
        Widget::Number,
        Widget::Switch,
        Widget::Upload,
        Widget::List,
        Widget::Select,
        Widget::Radio,
        Widget::MultiSelect,
        Widget::CheckboxGroup,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Widget::Input => "input",
            Widget::Textarea => "textarea",
            Widget::Markdown => "markdown",
            Widget::Url => "url",
            Widget::Color => "color",
            Widget::Datetime => "datetime",
            Widget::Number => "number",
            Widget::Switch => "switch",
            Widget::Upload => "upload",
            Widget::List => "list",
            Widget::Select => "select",
            Widget::Radio => "radio",
            Widget::MultiSelect => "multi-select",
            Widget::CheckboxGroup => "checkbox-group",
        }
    }

    /// Component selector understood by the form renderer.
    pub fn component(self) -> &'static str {
        match self {
            Widget::Input => "Input",
            Widget::Textarea => "Input.TextArea",
            Widget::Markdown => "MarkdownEditor",
            Widget::Url => "Input.Url",
            Widget::Color => "ColorPicker",
            Widget::Datetime => "DatePicker",
            Widget::Number => "NumberPicker",
            Widget::Switch => "Switch",
            Widget::Upload => "Upload",
            Widget::List => "ArrayItems",
            Widget::Select => "Select",
            Widget::Radio => "Radio.Group",
            Widget::MultiSelect => "Select.Multiple",
            Widget::CheckboxGroup => "Checkbox.Group",
        }
    }

    /// Widget inferred from a field type when no override is declared.
    pub fn for_field_type(field_type: &FieldType) -> Widget {
        match field_type {
            FieldType::Text => Widget::Input,
            FieldType::TextArea => Widget::Textarea,
            FieldType::Markdown => Widget::Markdown,
            FieldType::Url => Widget::Url,
            FieldType::Color => Widget::Color,
            FieldType::DateTime => Widget::Datetime,
            FieldType::Integer | FieldType::Number => Widget::Number,
            FieldType::Boolean => Widget::Switch,
            FieldType::Image | FieldType::File => Widget::Upload,
            FieldType::StringArray | FieldType::Array(_) => Widget::List,
            FieldType::Options(_) => Widget::Select,
            FieldType::OptionsMulti(_) => Widget::MultiSelect,
            FieldType::Custom(codec) => Widget::for_value_type(codec.value_type()),
        }
    }

    fn for_value_type(value_type: ValueType) -> Widget {
        match value_type {
            ValueType::String => Widget::Input,
            ValueType::Boolean => Widget::Switch,
            ValueType::Integer | ValueType::Float => Widget::Number,
            ValueType::Timestamp => Widget::Datetime,
            ValueType::StringArray | ValueType::TypedArray(_) => Widget::List,
            ValueType::Enum => Widget::Select,
            ValueType::EnumSet => Widget::MultiSelect,
        }
    }
}

impl fmt::Display for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Widget {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        Widget::ALL
            .into_iter()
            .find(|w| w.name().eq_ignore_ascii_case(raw) || w.component() == raw)
            .ok_or_else(|| format!("unknown widget '{raw}'"))
    }
}
