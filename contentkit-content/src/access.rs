//! Access to the field-typed members of a content instance.
//!
//! Statically described content types implement [`FieldAccess`] by hand (or
//! from generated code), matching member names to struct fields. Content types
//! only known at runtime use [`DynamicContent`].

use std::sync::Arc;

use contentkit_fields::{Field, FieldTypeRegistry};
use indexmap::IndexMap;

use crate::descriptor::ContentTypeDef;

/// Read and write the field-typed members of a content instance by name.
pub trait FieldAccess {
    /// The descriptor this instance conforms to.
    fn content_type(&self) -> &ContentTypeDef;

    /// Current field for a member, `None` when the member is unknown or unset.
    fn field(&self, name: &str) -> Option<&Field>;

    /// Assign a populated field onto a member. Unknown names are ignored.
    fn set_field(&mut self, name: &str, field: Field);
}

/// A content instance whose shape comes from a runtime descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicContent {
    content_type: Arc<ContentTypeDef>,
    fields: IndexMap<String, Field>,
}

impl DynamicContent {
    /// An instance with no members set.
    pub fn new(content_type: Arc<ContentTypeDef>) -> Self {
        Self {
            content_type,
            fields: IndexMap::new(),
        }
    }

    /// An instance with every resolvable member set to its empty field.
    pub fn with_empty_fields(content_type: Arc<ContentTypeDef>, registry: &FieldTypeRegistry) -> Self {
        let fields = content_type
            .fields
            .iter()
            .filter_map(|decl| {
                registry
                    .resolve_by_name(&decl.field_type)
                    .map(|field| (decl.name.clone(), field))
            })
            .collect();
        Self {
            content_type,
            fields,
        }
    }

    pub fn descriptor(&self) -> &Arc<ContentTypeDef> {
        &self.content_type
    }

    /// Members that currently hold a field, in the order they were set.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.get_mut(name)
    }

    /// Decode `raw` into the named member using the declared field type.
    ///
    /// Returns `false` when the member is not declared, its type does not
    /// resolve, or `raw` did not decode.
    pub fn set_value_string(&mut self, registry: &FieldTypeRegistry, name: &str, raw: &str) -> bool {
        let Some(decl) = self.content_type.field_decl(name) else {
            return false;
        };
        let Some(mut field) = registry.resolve_by_name(&decl.field_type) else {
            return false;
        };
        let ok = field.set_value_string(raw);
        self.fields.insert(name.to_string(), field);
        ok
    }
}

impl FieldAccess for DynamicContent {
    fn content_type(&self) -> &ContentTypeDef {
        &self.content_type
    }

    fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    fn set_field(&mut self, name: &str, field: Field) {
        if self.content_type.field_decl(name).is_some() {
            self.fields.insert(name.to_string(), field);
        }
    }
}
