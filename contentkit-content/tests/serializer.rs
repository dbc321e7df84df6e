//! Serializer behavior against statically described and runtime content types.

use std::sync::Arc;

use contentkit_content::{
    ContentFieldValue, ContentSerializer, ContentTypeDef, DynamicContent, FieldAccess, FieldDecl,
};
use contentkit_fields::{EnumDef, EnumMember, Field, FieldType, FieldTypeRegistry, FieldValue, ItemType};
use once_cell::sync::Lazy;
use rstest::rstest;

static PAGE: Lazy<ContentTypeDef> = Lazy::new(|| {
    ContentTypeDef::new("site.page", "Page")
        .field(FieldDecl::new("Title", "text"))
        .field(FieldDecl::new("Tags", "array<string>"))
});

/// A content type written by hand, as generated code would be.
#[derive(Debug, Clone, PartialEq)]
struct Page {
    title: Field,
    tags: Field,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            title: Field::new(FieldType::Text),
            tags: Field::new(FieldType::Array(ItemType::String)),
        }
    }
}

impl FieldAccess for Page {
    fn content_type(&self) -> &ContentTypeDef {
        &PAGE
    }

    fn field(&self, name: &str) -> Option<&Field> {
        match name {
            "Title" => Some(&self.title),
            "Tags" => Some(&self.tags),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, field: Field) {
        match name {
            "Title" => self.title = field,
            "Tags" => self.tags = field,
            _ => {}
        }
    }
}

fn serializer() -> ContentSerializer {
    let size = EnumDef::new(
        "size",
        vec![
            EnumMember::new("Small", 1),
            EnumMember::new("Medium", 2).with_description("Regular"),
            EnumMember::new("Large", 3),
        ],
    );
    let registry = FieldTypeRegistry::new().with_enum(size).unwrap();
    ContentSerializer::new(Arc::new(registry))
}

fn hello_page() -> Page {
    Page {
        title: Field::with_value(FieldType::Text, "Hello"),
        tags: Field::with_value(FieldType::Array(ItemType::String), vec!["a", "b"]),
    }
}

#[test]
fn page_serializes_to_flat_field_values() {
    let json = serializer().serialize(&hello_page()).unwrap();
    assert_eq!(
        json,
        r#"[{"fieldName":"Title","value":"Hello"},{"fieldName":"Tags","value":"a,b"}]"#
    );
}

#[test]
fn page_deserializes_back() {
    let serializer = serializer();
    let page: Page = serializer.deserialize(
        r#"[{"fieldName":"Title","value":"Hello"},{"fieldName":"Tags","value":"a,b"}]"#,
    );
    assert_eq!(page.title.as_text(), Some("Hello"));
    assert_eq!(page.tags.as_strings(), vec!["a", "b"]);
    assert_eq!(page, hello_page());
}

#[test]
fn default_page_round_trips() {
    let serializer = serializer();
    let json = serializer.serialize(&Page::default()).unwrap();
    assert_eq!(
        json,
        r#"[{"fieldName":"Title","value":""},{"fieldName":"Tags","value":""}]"#
    );
    let back: Page = serializer.deserialize(&json);
    assert_eq!(back, Page::default());
    assert_eq!(back.tags.value(), Some(&FieldValue::List(vec![])));
}

#[test]
fn pretty_output_parses_to_the_same_values() {
    let serializer = serializer();
    let pretty = serializer.serialize_pretty(&hello_page()).unwrap();
    let values: Vec<ContentFieldValue> = serde_json::from_str(&pretty).unwrap();
    assert_eq!(values, serializer.to_field_values(&hello_page()));
}

#[rstest]
#[case::unknown_field(r#"[{"fieldName":"Extra","value":"x"},{"fieldName":"Title","value":"Hello"}]"#)]
#[case::missing_field(r#"[{"fieldName":"Title","value":"Hello"}]"#)]
#[case::duplicate_field(r#"[{"fieldName":"Title","value":"Hello"},{"fieldName":"Title","value":"Bye"}]"#)]
fn tolerant_deserialization(#[case] text: &str) {
    let page: Page = serializer().deserialize(text);
    assert_eq!(page.title.as_text(), Some("Hello"));
    assert_eq!(page.tags, Page::default().tags);
}

#[rstest]
#[case("")]
#[case("{")]
#[case("null")]
#[case(r#"{"fieldName":"Title","value":"Hello"}"#)]
fn malformed_text_yields_default_instance(#[case] text: &str) {
    let page: Page = serializer().deserialize(text);
    assert_eq!(page, Page::default());
}

/// One field per built-in type, with a canonical sample value.
const SAMPLES: [(&str, &str, &str); 19] = [
    ("Text", "text", "Hello, world"),
    ("Url", "url", "https://example.com/docs?page=2"),
    ("Color", "color", "#1A2B3C"),
    ("Notes", "textArea", "line one\nline two"),
    ("Body", "markdown", "# Title\n\n*emphasis*"),
    ("When", "datetime", "2024-05-01T18:30:00Z"),
    ("Count", "integer", "-42"),
    ("Enabled", "boolean", "true"),
    ("Ratio", "number", "3.25"),
    ("Image", "image", "/media/cover.png"),
    ("Attachment", "file", "/media/report.pdf"),
    ("Labels", "array", "red,green"),
    ("Words", "array<string>", "alpha,beta"),
    ("Ints", "array<int>", "1,2,3"),
    ("Floats", "array<float>", "1.5,2"),
    ("Flags", "array<bool>", "true,false"),
    ("Dates", "array<datetime>", "2024-01-01T00:00:00Z,2024-06-01T12:00:00.250Z"),
    ("Size", "options<size>", "Medium"),
    ("Sizes", "options-multi<size>", "Small,Large"),
];

fn everything() -> Arc<ContentTypeDef> {
    let mut def = ContentTypeDef::new("test.everything", "Everything");
    for (name, system_name, _) in SAMPLES {
        def = def.field(FieldDecl::new(name, system_name));
    }
    Arc::new(def)
}

fn sample(name: &str) -> Option<&'static str> {
    SAMPLES.iter().find(|(n, _, _)| *n == name).map(|(_, _, raw)| *raw)
}

#[test]
fn every_builtin_type_round_trips() {
    let serializer = serializer();
    let def = everything();
    let mut content = DynamicContent::with_empty_fields(def.clone(), serializer.registry());
    for (name, _, raw) in SAMPLES {
        assert!(
            content.set_value_string(serializer.registry(), name, raw),
            "{name} rejected {raw:?}"
        );
    }

    let json = serializer.serialize(&content).unwrap();
    let back = serializer.deserialize_dynamic(def.clone(), &json);
    for decl in &def.fields {
        assert_eq!(
            back.field(&decl.name).map(Field::value),
            content.field(&decl.name).map(Field::value),
            "{}",
            decl.name
        );
    }

    // Canonical samples come back byte for byte.
    let values = serializer.to_field_values(&back);
    assert_eq!(values.len(), SAMPLES.len());
    for value in values {
        assert_eq!(Some(value.value.as_str()), sample(&value.field_name));
    }
}

#[test]
fn empty_instance_of_every_type_round_trips() {
    let serializer = serializer();
    let def = everything();
    let empty = DynamicContent::with_empty_fields(def.clone(), serializer.registry());
    let json = serializer.serialize(&empty).unwrap();
    let back = serializer.deserialize_dynamic(def, &json);
    assert_eq!(back, empty);
}

#[test]
fn reserialization_is_idempotent() {
    let serializer = serializer();
    let def = everything();
    let stored = r#"[
        {"fieldName":"Count","value":" 7 "},
        {"fieldName":"Enabled","value":"TRUE"},
        {"fieldName":"Ratio","value":"1.50"},
        {"fieldName":"When","value":"2024-05-01 08:00:00"},
        {"fieldName":"Size","value":"2"},
        {"fieldName":"Words","value":"a,,b,"}
    ]"#;
    let first = serializer.serialize(&serializer.deserialize_dynamic(def.clone(), stored)).unwrap();
    let second = serializer.serialize(&serializer.deserialize_dynamic(def.clone(), &first)).unwrap();
    assert_eq!(first, second);

    let values: Vec<ContentFieldValue> = serde_json::from_str(&first).unwrap();
    let get = |name: &str| {
        values
            .iter()
            .find(|v| v.field_name == name)
            .map(|v| v.value.clone())
            .unwrap()
    };
    assert_eq!(get("Count"), "7");
    assert_eq!(get("Enabled"), "true");
    assert_eq!(get("Ratio"), "1.5");
    assert_eq!(get("When"), "2024-05-01T08:00:00Z");
    assert_eq!(get("Size"), "Medium");
    assert_eq!(get("Words"), "a,b");
}

#[test]
fn removed_field_type_does_not_break_other_fields() {
    let def = Arc::new(
        ContentTypeDef::new("shop.item", "Item")
            .field(FieldDecl::new("Name", "text"))
            .field(FieldDecl::new("Fit", "options<fit>")),
    );
    let stored = r#"[{"fieldName":"Name","value":"Coat"},{"fieldName":"Fit","value":"Slim"}]"#;
    let content = serializer().deserialize_dynamic(def, stored);
    assert_eq!(content.field("Name").unwrap().as_text(), Some("Coat"));
    assert!(content.field("Fit").is_none());
}
