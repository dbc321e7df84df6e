//! Derivation of form schemas from content type descriptors.
//!
//! A schema depends only on static descriptor metadata, so generated schemas are
//! memoized per content type id in a [`SchemaCache`]. Two callers racing on an
//! expired entry may both regenerate; the later write wins.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use contentkit_config::SchemaSettings;
use contentkit_content::{ContentTypeCatalog, ContentTypeDef, FieldDecl};
use contentkit_fields::{EnumDef, FieldType, FieldTypeRegistry, ValueType};
use serde_json::{json, Value};
use tracing::debug;

use crate::cache::{CacheTtl, MemorySchemaCache, SchemaCache};
use crate::defaults::convert_default;
use crate::error::{Result, SchemaError};
use crate::node::{ContentSchema, OptionItem, SchemaNode, SchemaType, ValidatorRule};
use crate::widget::Widget;

/// Generator settings, usually taken from [`SchemaSettings`].
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaOptions {
    pub ttl: CacheTtl,
    /// Display format for datetime fields without their own `format`
    pub datetime_format: String,
}

impl From<&SchemaSettings> for SchemaOptions {
    fn from(settings: &SchemaSettings) -> Self {
        Self {
            ttl: CacheTtl::new(settings.sliding_ttl(), settings.absolute_ttl()),
            datetime_format: settings.datetime_format.clone(),
        }
    }
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self::from(&SchemaSettings::default())
    }
}

/// Builds and memoizes [`ContentSchema`]s.
pub struct SchemaGenerator {
    registry: Arc<FieldTypeRegistry>,
    cache: Arc<dyn SchemaCache>,
    options: SchemaOptions,
    generations: AtomicU64,
}

impl std::fmt::Debug for SchemaGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaGenerator")
            .field("options", &self.options)
            .field("generations", &self.generation_count())
            .finish_non_exhaustive()
    }
}

impl SchemaGenerator {
    pub fn new(
        registry: Arc<FieldTypeRegistry>,
        cache: Arc<dyn SchemaCache>,
        options: SchemaOptions,
    ) -> Self {
        Self {
            registry,
            cache,
            options,
            generations: AtomicU64::new(0),
        }
    }

    /// Generator backed by a fresh in-process cache.
    pub fn with_memory_cache(registry: Arc<FieldTypeRegistry>, options: SchemaOptions) -> Self {
        Self::new(registry, Arc::new(MemorySchemaCache::new()), options)
    }

    pub fn options(&self) -> &SchemaOptions {
        &self.options
    }

    /// Number of schemas built rather than served from the cache.
    pub fn generation_count(&self) -> u64 {
        self.generations.load(Ordering::Relaxed)
    }

    /// Schema for `content_type`, from the cache when a live entry exists.
    pub fn generate_schema(&self, content_type: &ContentTypeDef) -> Result<Arc<ContentSchema>> {
        if let Err(e) = content_type.validate() {
            return Err(SchemaError::NotAContentType {
                id: content_type.id.clone(),
                reason: e.to_string(),
            });
        }

        if let Some(schema) = self.cache.get(&content_type.id) {
            return Ok(schema);
        }

        let schema = Arc::new(self.build(content_type));
        self.generations.fetch_add(1, Ordering::Relaxed);
        self.cache
            .set(&content_type.id, schema.clone(), self.options.ttl);
        debug!(
            content_type = %content_type.id,
            properties = schema.properties.len(),
            "generated schema"
        );
        Ok(schema)
    }

    pub fn generate_schema_json(&self, content_type: &ContentTypeDef) -> Result<String> {
        let schema = self.generate_schema(content_type)?;
        Ok(serde_json::to_string(schema.as_ref())?)
    }

    /// Schema for the catalog entry with the given id.
    pub fn generate_for(&self, catalog: &ContentTypeCatalog, id: &str) -> Result<Arc<ContentSchema>> {
        let content_type = catalog
            .get(id)
            .ok_or_else(|| SchemaError::UnknownContentType { id: id.to_string() })?;
        self.generate_schema(&content_type)
    }

    /// Drop the cached schema for one content type.
    pub fn invalidate(&self, id: &str) {
        self.cache.remove(id);
    }

    fn build(&self, content_type: &ContentTypeDef) -> ContentSchema {
        let mut schema = ContentSchema::new();
        schema.title = Some(content_type.display_name.clone());
        schema.description = content_type.description.clone();

        let mut decls: Vec<&FieldDecl> = content_type.fields.iter().collect();
        decls.sort_by_key(|d| d.order.unwrap_or(0));

        for decl in decls {
            let Some(field_type) = self.registry.field_type(&decl.field_type) else {
                debug!(
                    field = %decl.name,
                    field_type = %decl.field_type,
                    "no field type registered, leaving field out of the schema"
                );
                continue;
            };
            let node = self.field_node(decl, &field_type);
            if decl.rules.required {
                schema.required.push(decl.name.clone());
            }
            schema.properties.insert(decl.name.clone(), node);
        }
        schema
    }

    fn field_node(&self, decl: &FieldDecl, field_type: &FieldType) -> SchemaNode {
        let title = decl
            .display_name
            .clone()
            .or_else(|| field_type.enum_def().and_then(|d| d.description.clone()))
            .unwrap_or_else(|| decl.name.clone());
        let format = decl
            .format
            .as_deref()
            .unwrap_or(&self.options.datetime_format);
        let mut node = type_node(field_type, title, format);
        node.description = decl.description.clone();

        let rules = &decl.rules;
        node.min_length = rules.min_length;
        node.max_length = rules.max_length;
        node.min = rules.min;
        node.max = rules.max;
        if let Some(pattern) = &rules.pattern {
            node.pattern = Some(pattern.clone());
            node.validators
                .push(ValidatorRule::pattern(pattern, rules.pattern_message.clone()));
        }
        if rules.required {
            node.required_message = rules.required_message.clone();
        }
        if let Some(compare) = &decl.compare {
            let expression = format!("$self.value {} $values.{}", compare.op.symbol(), compare.field);
            node.validators
                .push(ValidatorRule::compare(expression, compare.message.clone()));
        }

        if let Some(declared) = &decl.default {
            node.default = convert_default(field_type, declared);
            if node.default.is_none() {
                debug!(field = %decl.name, default = %declared, "ignoring default that does not fit the field type");
            }
        }

        if let Some(raw) = &decl.widget {
            match raw.parse::<Widget>() {
                Ok(widget) => node.set_widget(widget),
                Err(e) => debug!(field = %decl.name, "{e}"),
            }
        }
        node
    }
}

/// Node carrying the kind, widget and component props of a field type.
fn type_node(field_type: &FieldType, title: String, datetime_format: &str) -> SchemaNode {
    let widget = Widget::for_field_type(field_type);
    match field_type {
        FieldType::Text | FieldType::TextArea | FieldType::Markdown | FieldType::Color => {
            SchemaNode::new(SchemaType::String, title, widget)
        }
        FieldType::Url => {
            let mut node = SchemaNode::new(SchemaType::String, title, widget);
            node.validators.push(ValidatorRule::url());
            node
        }
        FieldType::DateTime => datetime_node(title, datetime_format),
        FieldType::Integer => number_node(title, 0),
        FieldType::Number => number_node(title, 2),
        FieldType::Boolean => SchemaNode::new(SchemaType::Boolean, title, widget),
        FieldType::Image => {
            let mut node = SchemaNode::new(SchemaType::String, title, widget);
            node.props.insert("accept".into(), json!("image/*"));
            node
        }
        FieldType::File => SchemaNode::new(SchemaType::String, title, widget),
        FieldType::StringArray => list_node(title, &FieldType::Text, "Text", datetime_format),
        FieldType::Array(item) => {
            list_node(title, &FieldType::for_item(*item), item.label(), datetime_format)
        }
        FieldType::Options(def) => options_node(SchemaType::String, title, widget, def),
        FieldType::OptionsMulti(def) => options_node(SchemaType::Array, title, widget, def),
        FieldType::Custom(codec) => match codec.value_type() {
            ValueType::Boolean => SchemaNode::new(SchemaType::Boolean, title, widget),
            ValueType::Integer => number_node(title, 0),
            ValueType::Float => number_node(title, 2),
            ValueType::Timestamp => datetime_node(title, datetime_format),
            ValueType::StringArray | ValueType::TypedArray(_) | ValueType::EnumSet => {
                SchemaNode::new(SchemaType::Array, title, widget)
            }
            ValueType::String | ValueType::Enum => {
                SchemaNode::new(SchemaType::String, title, widget)
            }
        },
    }
}

fn number_node(title: String, precision: u32) -> SchemaNode {
    let mut node = SchemaNode::new(SchemaType::Number, title, Widget::Number);
    node.props.insert("precision".into(), json!(precision));
    node
}

fn datetime_node(title: String, format: &str) -> SchemaNode {
    let mut node = SchemaNode::new(SchemaType::String, title, Widget::Datetime);
    node.props
        .insert("showTime".into(), Value::Bool(format.contains(['H', 'h'])));
    node.props.insert("format".into(), json!(format));
    node
}

fn list_node(title: String, item_type: &FieldType, item_title: &str, format: &str) -> SchemaNode {
    let mut node = SchemaNode::new(SchemaType::Array, title, Widget::List);
    node.items = Some(Box::new(type_node(item_type, item_title.to_string(), format)));
    node
}

fn options_node(kind: SchemaType, title: String, widget: Widget, def: &EnumDef) -> SchemaNode {
    let mut node = SchemaNode::new(kind, title, widget);
    let options: Vec<OptionItem> = def
        .members
        .iter()
        .map(|m| OptionItem {
            label: m.label().to_string(),
            value: m.value.to_string(),
        })
        .collect();
    node.props.insert("options".into(), json!(options));
    node
}
